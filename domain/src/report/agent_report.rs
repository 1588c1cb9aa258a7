//! Normalized per-agent outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed status taxonomy consumed by scoring and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Passed,
    Failed,
    NoResults,
    Skipped,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Passed => "PASSED",
            AgentStatus::Failed => "FAILED",
            AgentStatus::NoResults => "NO_RESULTS",
            AgentStatus::Skipped => "SKIPPED",
            AgentStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the expected output landed in an agent's answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualOutput {
    pub rank: Option<usize>,
    pub score: Option<f64>,
}

impl ActualOutput {
    pub fn new(rank: usize, score: Option<f64>) -> Self {
        Self {
            rank: Some(rank),
            score,
        }
    }

    /// Output not found anywhere.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Normalized outcome for one (asset, agent) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<ActualOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_nodes_found: Option<String>,
}

impl AgentReport {
    pub fn new(status: AgentStatus) -> Self {
        Self {
            status,
            message: None,
            actual_output: None,
            expected_nodes_found: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(AgentStatus::Failed).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AgentStatus::Error).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_actual_output(mut self, output: Option<ActualOutput>) -> Self {
        self.actual_output = output;
        self
    }

    /// Short label for tables: the status, or the message for test errors.
    pub fn tag(&self) -> &str {
        match (self.status, self.message.as_deref()) {
            (AgentStatus::Passed, _) => "PASSED",
            (AgentStatus::NoResults, _) => "No results",
            (AgentStatus::Failed, Some(msg)) if msg == TEST_ERROR => TEST_ERROR,
            (status, _) => status.as_str(),
        }
    }
}

/// Message for responses that could not be interpreted.
pub const TEST_ERROR: &str = "Test Error";
/// Message for an agent that answered with an empty result list.
pub const NO_RESULTS: &str = "No results";
/// Message for an agent whose polling budget expired.
pub const TIMED_OUT: &str = "Timed out";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::NoResults).unwrap(),
            "\"NO_RESULTS\""
        );
    }

    #[test]
    fn test_report_skips_empty_fields() {
        let json = serde_json::to_value(AgentReport::new(AgentStatus::Passed)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "PASSED"}));
    }

    #[test]
    fn test_tag() {
        assert_eq!(AgentReport::failed(TEST_ERROR).tag(), "Test Error");
        assert_eq!(AgentReport::failed("Status code: 500").tag(), "FAILED");
        assert_eq!(
            AgentReport::new(AgentStatus::NoResults).with_message(NO_RESULTS).tag(),
            "No results"
        );
    }
}
