//! Registry configuration from TOML (`[registry]` section)

use crate::registry::DEFAULT_REGISTRY_URL;
use serde::{Deserialize, Serialize};

/// Raw registry configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    /// SmartAPI listing URL
    pub url: String,
    /// Participants must declare this TRAPI version line
    pub trapi_version: String,
    pub timeout_seconds: u64,
}

impl Default for FileRegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            trapi_version: "1.6.0".to_string(),
            timeout_seconds: 30,
        }
    }
}
