//! Domain layer for translator-test-harness
//!
//! This crate contains the test model, query construction, and result
//! normalization. It performs no I/O and has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Test cases and assets
//!
//! A [`TestCase`] is one query scenario against one environment. Each of its
//! [`TestAsset`]s expects a particular output curie in a quality bucket
//! ([`ExpectedOutput`]), or a set of intermediate nodes on a path.
//!
//! ## Payloads
//!
//! Assets sharing input, predicate and qualifier values produce the same
//! [`QueryPayload`] and the same [`PayloadHash`], so each distinct query is
//! dispatched once.
//!
//! ## Reports
//!
//! Raw participant responses ([`AgentResponse`]) are classified once and
//! normalized into [`AgentReport`]s, which decide each asset's
//! [`AssetStatus`].

pub mod config;
pub mod core;
pub mod curie;
pub mod dispatch;
pub mod query;
pub mod registry;
pub mod report;
pub mod testing;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, string::agent_id};
pub use curie::{NormalizedCurie, NormalizedCuries};
pub use dispatch::{
    AgentResponse, DispatchRecord, MISSING_PK, PARENT_PK, PayloadOutcome, ResultsOutcome,
    STATUS_NO_RESPONSE, STATUS_TIMED_OUT,
};
pub use query::{GenerationError, PayloadHash, QueryPayload, generate_query};
pub use registry::{Participant, Registry, version_matches};
pub use report::{
    ActualOutput, AgentReport, AgentStatus, AssetStatus, StatusCounts, TestAssetReport,
    TestCaseReport, build_asset_report, normalize_response,
};
pub use testing::{
    Component, Environment, Expectation, ExpectedOutput, PathNode, Qualifier, TestAsset,
    TestCase, TestObjective,
};
