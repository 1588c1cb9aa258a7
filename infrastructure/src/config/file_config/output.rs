//! `[output]` section

use harness_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Report format when `--output` is not given (summary if unset)
    pub format: Option<OutputFormat>,
    /// ANSI colors in the console report
    pub color: bool,
    /// Progress bar on stderr; `-q` turns it off regardless
    pub progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;
    use super::*;

    #[test]
    fn test_partial_output_section_keeps_defaults() {
        let config: FileConfig = toml::from_str("[output]\nformat = \"json\"\nprogress = false\n").unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.output.color);
        assert!(!config.output.progress);
    }
}
