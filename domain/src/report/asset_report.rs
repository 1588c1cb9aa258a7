//! Per-asset and per-test-case reports.

use super::agent_report::{AgentReport, AgentStatus};
use super::normalizer::normalize_response;
use crate::dispatch::PayloadOutcome;
use crate::testing::{ExpectedOutput, TestAsset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Message for assets whose payload produced no responses at all.
pub const NO_RESPONSES: &str = "No responses collected";
/// Message for assets of a test case whose objective cannot be run.
pub const UNSUPPORTED_TEST_TYPE: &str = "Unsupported test type";

/// Final status of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Passed,
    Failed,
    Skipped,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Passed => "PASSED",
            AssetStatus::Failed => "FAILED",
            AssetStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestAssetReport {
    pub asset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<ExpectedOutput>,
    pub status: AssetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub pks: BTreeMap<String, String>,
    /// Keyed by agent id.
    pub results: BTreeMap<String, AgentReport>,
}

impl TestAssetReport {
    fn empty(asset: &TestAsset, status: AssetStatus) -> Self {
        Self {
            asset_id: asset.id.clone(),
            name: asset.name.clone(),
            expected_output: asset.expectation.expected_output(),
            status,
            message: None,
            pks: BTreeMap::new(),
            results: BTreeMap::new(),
        }
    }

    /// The asset could not be run (e.g. its query could not be generated).
    pub fn skipped(asset: &TestAsset, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(asset, AssetStatus::Skipped)
        }
    }

    /// The asset belongs to a test case with an objective this harness cannot run.
    pub fn unsupported(asset: &TestAsset) -> Self {
        Self {
            message: Some(UNSUPPORTED_TEST_TYPE.to_string()),
            ..Self::empty(asset, AssetStatus::Failed)
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.asset_id)
    }
}

/// Build an asset's report from the outcome of its (possibly shared) payload.
///
/// A broadcast failure applies the same error to every agent in
/// `broadcast_agents` and skips the asset. Otherwise the hub's verdict
/// decides when the hub reported; without it every agent must pass.
pub fn build_asset_report(
    asset: &TestAsset,
    outcome: &PayloadOutcome,
    hub_agent: &str,
    broadcast_agents: &[String],
) -> TestAssetReport {
    let record = match outcome {
        PayloadOutcome::Failed { error } => {
            let mut report = TestAssetReport::skipped(asset, error.clone());
            report.results = broadcast_agents
                .iter()
                .map(|agent| (agent.clone(), AgentReport::error(error.clone())))
                .collect();
            return report;
        }
        PayloadOutcome::Dispatched(record) => record,
    };

    if record.is_empty() {
        let mut report = TestAssetReport::skipped(asset, NO_RESPONSES);
        report.pks = record.pks.clone();
        return report;
    }

    let results: BTreeMap<String, AgentReport> = record
        .responses
        .iter()
        .map(|(agent, response)| {
            (
                agent.clone(),
                normalize_response(response, &asset.expectation),
            )
        })
        .collect();

    let passed = match results.get(hub_agent) {
        Some(hub) => hub.status == AgentStatus::Passed,
        None => results.values().all(|r| r.status == AgentStatus::Passed),
    };

    TestAssetReport {
        pks: record.pks.clone(),
        results,
        ..TestAssetReport::empty(
            asset,
            if passed {
                AssetStatus::Passed
            } else {
                AssetStatus::Failed
            },
        )
    }
}

/// PASSED / FAILED / SKIPPED tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: AssetStatus) {
        match status {
            AssetStatus::Passed => self.passed += 1,
            AssetStatus::Failed => self.failed += 1,
            AssetStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn add(&mut self, other: StatusCounts) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Reports for every asset of one test case, in asset order.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseReport {
    pub test_case_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub assets: Vec<TestAssetReport>,
}

impl TestCaseReport {
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for asset in &self.assets {
            counts.record(asset.status);
        }
        counts
    }
}
