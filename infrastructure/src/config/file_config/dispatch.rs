//! Dispatch configuration from TOML (`[dispatch]` section)

use harness_application::{DEFAULT_HUB_INFORES, DispatchParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Maximum in-flight participant requests per role
    pub concurrency: usize,
    pub poll_interval_seconds: u64,
    /// Budget for each hub child
    pub child_timeout_seconds: u64,
    /// Budget for the hub's merged result
    pub merge_timeout_seconds: u64,
    /// Per-request timeout for query submissions
    pub query_timeout_seconds: u64,
    /// Per-request timeout for status polls
    pub poll_request_timeout_seconds: u64,
    pub hub_infores: String,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            poll_interval_seconds: 10,
            child_timeout_seconds: 360,
            merge_timeout_seconds: 600,
            query_timeout_seconds: 600,
            poll_request_timeout_seconds: 30,
            hub_infores: DEFAULT_HUB_INFORES.to_string(),
        }
    }
}

impl FileDispatchConfig {
    pub fn to_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_concurrency(self.concurrency)
            .with_poll_interval(Duration::from_secs(self.poll_interval_seconds))
            .with_child_timeout(Duration::from_secs(self.child_timeout_seconds))
            .with_merge_timeout(Duration::from_secs(self.merge_timeout_seconds))
            .with_hub_infores(self.hub_infores.clone())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_seconds)
    }

    pub fn poll_request_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_request_timeout_seconds)
    }
}
