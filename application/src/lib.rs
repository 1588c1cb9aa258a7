//! Application layer for translator-test-harness
//!
//! This crate contains the dispatch engine, use cases, port definitions, and
//! dispatch configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_HUB_INFORES, DispatchParams};
pub use ports::{
    node_normalizer::NodeNormalizer,
    participant_gateway::{GatewayError, HttpReply, ParticipantGateway},
    progress::{HarnessProgress, NoProgress},
    registry_source::{RegistryError, RegistrySource},
};
pub use use_cases::dispatch::{DispatchEngine, PollOutcome, PollStep, poll_until};
pub use use_cases::normalize_curies::NormalizeCuriesUseCase;
pub use use_cases::run_suite::{
    AgentStats, PATHFINDER_BUCKET, RunSuiteError, RunSuiteInput, RunSuiteUseCase, SuiteReport,
};
pub use use_cases::run_test_case::RunTestCaseUseCase;
