//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod dispatch;
mod node_norm;
mod output;
mod registry;

pub use dispatch::FileDispatchConfig;
pub use node_norm::FileNodeNormConfig;
pub use output::FileOutputConfig;
pub use registry::FileRegistryConfig;

use harness_domain::registry::major_minor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("dispatch.concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("{0} must be at least 1 second")]
    InvalidDuration(&'static str),

    #[error("registry.trapi_version '{0}' has no numeric major.minor prefix")]
    InvalidTrapiVersion(String),

    #[error("dispatch.hub_infores '{0}' must start with 'infores:'")]
    InvalidHubInfores(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Participant registry
    pub registry: FileRegistryConfig,
    /// Fan-out and polling
    pub dispatch: FileDispatchConfig,
    /// Identity resolution service
    pub node_norm: FileNodeNormConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.dispatch.concurrency == 0 {
            return Err(ConfigValidationError::InvalidConcurrency);
        }

        let durations = [
            ("registry.timeout_seconds", self.registry.timeout_seconds),
            ("dispatch.poll_interval_seconds", self.dispatch.poll_interval_seconds),
            ("dispatch.child_timeout_seconds", self.dispatch.child_timeout_seconds),
            ("dispatch.merge_timeout_seconds", self.dispatch.merge_timeout_seconds),
            ("dispatch.query_timeout_seconds", self.dispatch.query_timeout_seconds),
            (
                "dispatch.poll_request_timeout_seconds",
                self.dispatch.poll_request_timeout_seconds,
            ),
            ("node_norm.timeout_seconds", self.node_norm.timeout_seconds),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigValidationError::InvalidDuration(*field));
        }

        if major_minor(&self.registry.trapi_version).is_none() {
            return Err(ConfigValidationError::InvalidTrapiVersion(
                self.registry.trapi_version.clone(),
            ));
        }

        if !self.dispatch.hub_infores.starts_with("infores:") {
            return Err(ConfigValidationError::InvalidHubInfores(
                self.dispatch.hub_infores.clone(),
            ));
        }

        Ok(())
    }
}
