//! Infrastructure layer for translator-test-harness
//!
//! This crate contains the `reqwest` adapters that implement the ports
//! defined in the application layer, configuration file loading, and
//! test-suite file loading.

pub mod config;
pub mod http;
pub mod registry;
pub mod suite;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDispatchConfig, FileNodeNormConfig,
    FileOutputConfig, FileRegistryConfig,
};
pub use http::{HttpParticipantGateway, NodeNormClient, NodeNormUrls};
pub use registry::{DEFAULT_REGISTRY_URL, SmartApiRegistry, parse_registry};
pub use suite::{LoadedSuite, SuiteLoadError, SuiteLoader};
