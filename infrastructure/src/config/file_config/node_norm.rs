//! Node normalizer configuration from TOML (`[node_norm]` section)

use crate::http::NodeNormUrls;
use serde::{Deserialize, Serialize};

/// Raw node normalizer configuration from TOML
///
/// ```toml
/// [node_norm]
/// ci = "https://nodenorm.ci.transltr.io"
/// timeout_seconds = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNodeNormConfig {
    /// Base URL per environment (`dev`, `ci`, `test`, `prod`)
    #[serde(flatten)]
    pub urls: NodeNormUrls,
    pub timeout_seconds: u64,
}

impl Default for FileNodeNormConfig {
    fn default() -> Self {
        Self {
            urls: NodeNormUrls::default(),
            timeout_seconds: 30,
        }
    }
}
