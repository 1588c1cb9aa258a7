//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the suite report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every asset with every agent's status
    Full,
    /// Per-test-case totals and agent statistics
    Summary,
    /// JSON report
    Json,
}

impl From<OutputFormat> for harness_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => harness_domain::OutputFormat::Full,
            OutputFormat::Summary => harness_domain::OutputFormat::Summary,
            OutputFormat::Json => harness_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for translator-test-harness
#[derive(Parser, Debug)]
#[command(name = "test-harness")]
#[command(author, version, about = "Translator test harness - dispatch test queries and score participant answers")]
#[command(long_about = r#"
Runs declarative Translator test cases against every registered participant.

For each test case the harness:
1. Normalizes the test curies
2. Builds one query per distinct input/predicate/qualifier combination
3. Sends each query to every participant of the requested roles,
   polling the ARS until its children and merged result are done
4. Scores every participant's answer against the expected output bucket

Configuration files are loaded from (in priority order):
1. TEST_HARNESS_* environment variables
2. --config <path>              Explicit config file
3. ./test_harness.toml          Project-level config
4. ~/.config/translator-test-harness/config.toml   Global config

Example:
  test-harness tests/sprint_4.json
  test-harness tests/cases.json --concurrency 4 --output full -v
"#)]
pub struct Cli {
    /// Test suite JSON file (suite object, map of test cases, or array)
    #[arg(value_name = "TESTS_PATH", required_unless_present = "show_config")]
    pub tests_path: Option<PathBuf>,

    /// Suite name used in the report (defaults to the suite id or file name)
    #[arg(long, value_name = "NAME")]
    pub suite: Option<String>,

    /// TRAPI version participants must declare (major.minor is compared)
    #[arg(long, value_name = "VERSION")]
    pub trapi_version: Option<String>,

    /// Maximum concurrent participant requests per role
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Output format (defaults to the config value, then summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
