//! Run Suite use case
//!
//! Fetches the registry once, runs every runnable test case in order, and
//! aggregates the results.

use crate::config::DispatchParams;
use crate::ports::node_normalizer::NodeNormalizer;
use crate::ports::participant_gateway::ParticipantGateway;
use crate::ports::progress::{HarnessProgress, NoProgress};
use crate::ports::registry_source::{RegistryError, RegistrySource};
use crate::use_cases::run_test_case::RunTestCaseUseCase;
use chrono::{DateTime, Utc};
use harness_domain::{
    AgentStatus, Environment, StatusCounts, TestCase, TestCaseReport, TestObjective,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Bucket label used in agent statistics for path-finding assets.
pub const PATHFINDER_BUCKET: &str = "Pathfinder";

/// Errors that abort a suite run
#[derive(Error, Debug)]
pub enum RunSuiteError {
    #[error("Registry unavailable: {0}")]
    Registry(#[from] RegistryError),

    #[error("Suite run cancelled")]
    Cancelled,
}

impl RunSuiteError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunSuiteError::Cancelled)
    }
}

/// Input for the RunSuite use case
#[derive(Debug, Clone)]
pub struct RunSuiteInput {
    pub suite: String,
    pub test_cases: Vec<TestCase>,
    /// Participants must declare this TRAPI version (major.minor).
    pub trapi_version: String,
}

impl RunSuiteInput {
    pub fn new(suite: impl Into<String>, test_cases: Vec<TestCase>) -> Self {
        Self {
            suite: suite.into(),
            test_cases,
            trapi_version: "1.6.0".to_string(),
        }
    }

    pub fn with_trapi_version(mut self, version: impl Into<String>) -> Self {
        self.trapi_version = version.into();
        self
    }
}

/// agent → bucket → status → count
pub type AgentStats = BTreeMap<String, BTreeMap<String, BTreeMap<AgentStatus, usize>>>;

/// Outcome of a whole suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    pub test_cases: Vec<TestCaseReport>,
    pub totals: StatusCounts,
    pub agent_stats: AgentStats,
}

impl SuiteReport {
    fn new(suite: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            suite: suite.to_string(),
            started_at,
            duration_secs: 0.0,
            environment: None,
            test_cases: Vec::new(),
            totals: StatusCounts::default(),
            agent_stats: AgentStats::new(),
        }
    }

    fn add(&mut self, report: TestCaseReport) {
        self.totals.add(report.counts());
        for asset in &report.assets {
            let bucket = asset
                .expected_output
                .map_or(PATHFINDER_BUCKET, |bucket| bucket.as_str());
            for (agent, agent_report) in &asset.results {
                *self
                    .agent_stats
                    .entry(agent.clone())
                    .or_default()
                    .entry(bucket.to_string())
                    .or_default()
                    .entry(agent_report.status)
                    .or_default() += 1;
            }
        }
        self.test_cases.push(report);
    }
}

/// Use case for running a test suite
pub struct RunSuiteUseCase<
    R: RegistrySource + 'static,
    G: ParticipantGateway + 'static,
    N: NodeNormalizer + 'static,
> {
    registry_source: Arc<R>,
    run_test_case: RunTestCaseUseCase<G, N>,
}

impl<R, G, N> RunSuiteUseCase<R, G, N>
where
    R: RegistrySource + 'static,
    G: ParticipantGateway + 'static,
    N: NodeNormalizer + 'static,
{
    pub fn new(
        registry_source: Arc<R>,
        gateway: Arc<G>,
        normalizer: Arc<N>,
        params: DispatchParams,
    ) -> Self {
        Self {
            registry_source,
            run_test_case: RunTestCaseUseCase::new(gateway, normalizer, params),
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunSuiteInput,
        cancellation: CancellationToken,
    ) -> Result<SuiteReport, RunSuiteError> {
        self.execute_with_progress(input, &NoProgress, cancellation)
            .await
    }

    /// Execute the use case with progress callbacks
    ///
    /// Cancelling the token drops the in-flight test case, which aborts all
    /// of its outstanding requests and polls.
    pub async fn execute_with_progress(
        &self,
        input: RunSuiteInput,
        progress: &dyn HarnessProgress,
        cancellation: CancellationToken,
    ) -> Result<SuiteReport, RunSuiteError> {
        let started = Instant::now();
        let mut report = SuiteReport::new(&input.suite, Utc::now());

        let registry = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(RunSuiteError::Cancelled),
            registry = self.registry_source.fetch(&input.trapi_version) => registry?,
        };
        info!("Registry has {} participant registrations", registry.len());

        let runnable: Vec<&TestCase> = input.test_cases.iter().filter(|c| is_runnable(c)).collect();
        info!("Running {} of {} test cases", runnable.len(), input.test_cases.len());
        progress.on_suite_start(&input.suite, runnable.len());

        for case in runnable {
            report.environment = Some(case.test_env);
            progress.on_test_case_start(&case.id, case.test_assets.len());
            let case_report = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Err(RunSuiteError::Cancelled),
                case_report = self.run_test_case.execute_with_progress(case, &registry, progress) => case_report,
            };
            progress.on_test_case_complete(&case_report);
            report.add(case_report);
        }

        report.duration_secs = started.elapsed().as_secs_f64();
        progress.on_suite_complete(&report.totals);
        info!(
            "Suite {} finished: {} passed, {} failed, {} skipped",
            report.suite, report.totals.passed, report.totals.failed, report.totals.skipped
        );
        Ok(report)
    }
}

/// Cases with missing fields and quantitative cases are not run.
fn is_runnable(case: &TestCase) -> bool {
    let Some(objective) = case.objective() else {
        warn!("Test has missing required fields: {}", case.id);
        return false;
    };
    if case.test_assets.is_empty() {
        warn!("Test has missing required fields: {}", case.id);
        return false;
    }
    if objective == TestObjective::QuantitativeTest {
        info!("Skipping quantitative test {}", case.id);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::participant_gateway::{GatewayError, HttpReply};
    use crate::use_cases::test_support::ScriptedGateway;
    use async_trait::async_trait;
    use harness_domain::{
        AssetStatus, Component, Expectation, ExpectedOutput, Participant, Registry, TestAsset,
    };
    use serde_json::{Value, json};
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct MockRegistry {
        registry: Option<Registry>,
    }

    #[async_trait]
    impl RegistrySource for MockRegistry {
        async fn fetch(&self, _target_version: &str) -> Result<Registry, RegistryError> {
            self.registry
                .clone()
                .ok_or_else(|| RegistryError::Fetch("connection refused".to_string()))
        }
    }

    struct IdentityNormalizer;

    #[async_trait]
    impl NodeNormalizer for IdentityNormalizer {
        async fn get_normalized_nodes(
            &self,
            _env: Environment,
            _curies: &[String],
        ) -> Result<Value, GatewayError> {
            Ok(json!({}))
        }
    }

    fn registry() -> Registry {
        Registry::new().with_participant(
            "staging",
            Participant::new("infores:aragorn", "http://aragorn", Component::Ara),
        )
    }

    fn case(id: &str) -> TestCase {
        TestCase::new(id, Environment::Ci)
            .with_components(vec![Component::Ara])
            .with_input("MONDO:1", "biolink:Disease")
            .with_predicate("biolink:treats")
            .with_asset(TestAsset::new(
                "Asset_1",
                "",
                "",
                Expectation::output("CHEBI:1", ExpectedOutput::TopAnswer),
            ))
    }

    fn passing_gateway() -> ScriptedGateway {
        ScriptedGateway::new().on_post(
            "http://aragorn/query",
            Ok(HttpReply::ok(json!({"message": {"results": [{
                "node_bindings": {"SN": [{"id": "CHEBI:1"}], "ON": [{"id": "MONDO:1"}]},
                "analyses": [{"score": 0.7}]
            }]}}))),
        )
    }

    fn use_case(
        registry: Option<Registry>,
        gateway: ScriptedGateway,
    ) -> RunSuiteUseCase<MockRegistry, ScriptedGateway, IdentityNormalizer> {
        RunSuiteUseCase::new(
            Arc::new(MockRegistry { registry }),
            Arc::new(gateway),
            Arc::new(IdentityNormalizer),
            DispatchParams::default(),
        )
    }

    #[tokio::test]
    async fn test_suite_totals_and_agent_stats() {
        let mut no_assets = case("TC_empty");
        no_assets.test_assets.clear();
        let quantitative = case("TC_quant").with_objective("QuantitativeTest");
        let input = RunSuiteInput::new(
            "sprint_4",
            vec![case("TC_1"), no_assets, quantitative, case("TC_2")],
        );

        let report = use_case(Some(registry()), passing_gateway())
            .execute(input, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.test_cases.len(), 2);
        assert_eq!(report.totals.passed, 2);
        assert_eq!(report.environment, Some(Environment::Ci));
        assert_eq!(
            report.agent_stats["aragorn"]["TopAnswer"][&AgentStatus::Passed],
            2
        );
        assert_eq!(report.test_cases[0].assets[0].status, AssetStatus::Passed);
    }

    #[tokio::test]
    async fn test_registry_failure_is_fatal() {
        let result = use_case(None, passing_gateway())
            .execute(RunSuiteInput::new("s", vec![case("TC_1")]), CancellationToken::new())
            .await;
        assert!(matches!(result, Err(RunSuiteError::Registry(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let result = use_case(Some(registry()), passing_gateway())
            .execute(RunSuiteInput::new("s", vec![case("TC_1")]), token)
            .await;
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_running_case() {
        let slow = passing_gateway().with_post_delay(Duration::from_secs(300));
        let use_case = use_case(Some(registry()), slow);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            canceller.cancel();
        });

        let result = use_case
            .execute(RunSuiteInput::new("s", vec![case("TC_1")]), token)
            .await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
