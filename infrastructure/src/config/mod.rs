//! Configuration file loading for translator-test-harness
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TEST_HARNESS_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./test_harness.toml` or `./.test_harness.toml`
//! 4. Global: `$XDG_CONFIG_HOME/translator-test-harness/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDispatchConfig, FileNodeNormConfig, FileOutputConfig,
    FileRegistryConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
