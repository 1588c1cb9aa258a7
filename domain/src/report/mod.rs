//! Normalized outcomes: per-agent reports, scoring, per-asset verdicts.

pub mod agent_report;
pub mod asset_report;
pub mod normalizer;
pub mod scoring;

pub use agent_report::{ActualOutput, AgentReport, AgentStatus, NO_RESULTS, TEST_ERROR, TIMED_OUT};
pub use asset_report::{
    AssetStatus, NO_RESPONSES, StatusCounts, TestAssetReport, TestCaseReport,
    UNSUPPORTED_TEST_TYPE, build_asset_report,
};
pub use normalizer::normalize_response;
pub use scoring::{ScoringError, Scored, score, score_acceptance, score_pathfinder};
