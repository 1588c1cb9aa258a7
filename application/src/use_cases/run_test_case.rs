//! Run Test Case use case
//!
//! One test case end to end: normalize curies, build one payload per
//! distinct query, dispatch, and turn the raw responses into asset reports.

use crate::config::DispatchParams;
use crate::ports::node_normalizer::NodeNormalizer;
use crate::ports::participant_gateway::ParticipantGateway;
use crate::ports::progress::{HarnessProgress, NoProgress};
use crate::use_cases::dispatch::DispatchEngine;
use crate::use_cases::normalize_curies::NormalizeCuriesUseCase;
use harness_domain::{
    PayloadHash, PayloadOutcome, QueryPayload, Registry, TestAsset, TestAssetReport, TestCase,
    TestCaseReport, TestObjective, build_asset_report, generate_query,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

/// Use case for running one test case
pub struct RunTestCaseUseCase<G: ParticipantGateway + 'static, N: NodeNormalizer + 'static> {
    engine: DispatchEngine<G>,
    normalize: NormalizeCuriesUseCase<N>,
}

impl<G: ParticipantGateway + 'static, N: NodeNormalizer + 'static> RunTestCaseUseCase<G, N> {
    pub fn new(gateway: Arc<G>, normalizer: Arc<N>, params: DispatchParams) -> Self {
        Self {
            engine: DispatchEngine::new(gateway, params),
            normalize: NormalizeCuriesUseCase::new(normalizer),
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, case: &TestCase, registry: &Registry) -> TestCaseReport {
        self.execute_with_progress(case, registry, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        case: &TestCase,
        registry: &Registry,
        progress: &dyn HarnessProgress,
    ) -> TestCaseReport {
        let span = info_span!("test_case", id = %case.id);
        self.run(case, registry, progress).instrument(span).await
    }

    async fn run(
        &self,
        case: &TestCase,
        registry: &Registry,
        progress: &dyn HarnessProgress,
    ) -> TestCaseReport {
        let mut report = TestCaseReport {
            test_case_id: case.id.clone(),
            name: case.name.clone(),
            objective: case.test_case_objective.clone(),
            assets: Vec::new(),
        };

        if let Some(TestObjective::Other(objective)) = case.objective() {
            warn!("Unsupported test type: {}", objective);
            report.assets = case.test_assets.iter().map(TestAssetReport::unsupported).collect();
            return report;
        }

        let normalized = self.normalize.execute(case.test_env, &case.curies()).await;
        let assets: Vec<TestAsset> = case
            .resolved_assets()
            .iter()
            .map(|asset| normalized.apply(asset))
            .collect();

        let (payloads, plan) = plan_payloads(&assets);
        info!(
            "Running {} assets as {} distinct queries",
            assets.len(),
            payloads.len()
        );

        let outcomes = self
            .engine
            .dispatch(&payloads, registry, case.test_env, &case.components)
            .await;
        for (hash, outcome) in &outcomes {
            let agents = outcome.record().map_or(0, |r| r.responses.len());
            progress.on_payload_dispatched(hash, agents);
        }

        let broadcast_agents: Vec<String> = case
            .components
            .iter()
            .flat_map(|&component| registry.participants(case.test_env, component))
            .map(|p| p.agent_id().to_string())
            .collect();
        let hub_agent = self.engine.params().hub_agent();
        let unreached = PayloadOutcome::failed("Query was never dispatched");

        report.assets = assets
            .iter()
            .zip(plan)
            .map(|(asset, planned)| match planned {
                Ok(hash) => build_asset_report(
                    asset,
                    outcomes.get(&hash).unwrap_or(&unreached),
                    hub_agent,
                    &broadcast_agents,
                ),
                Err(message) => TestAssetReport::skipped(asset, message),
            })
            .collect();
        report
    }
}

/// One payload per distinct hash, plus each asset's hash (or why it has none).
fn plan_payloads(
    assets: &[TestAsset],
) -> (
    BTreeMap<PayloadHash, QueryPayload>,
    Vec<Result<PayloadHash, String>>,
) {
    let mut payloads = BTreeMap::new();
    let plan = assets
        .iter()
        .map(|asset| match generate_query(asset) {
            Ok(payload) => {
                let hash = PayloadHash::of(asset);
                payloads.entry(hash.clone()).or_insert(payload);
                Ok(hash)
            }
            Err(e) => {
                warn!("Skipping asset {}: {}", asset.id, e);
                Err(e.to_string())
            }
        })
        .collect();
    (payloads, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::participant_gateway::{GatewayError, HttpReply};
    use crate::use_cases::test_support::ScriptedGateway;
    use async_trait::async_trait;
    use harness_domain::{
        AgentStatus, AssetStatus, Component, Environment, Expectation, ExpectedOutput, Participant,
    };
    use serde_json::{Value, json};

    // ==================== Test Mocks ====================

    struct MockNormalizer {
        answer: Value,
    }

    #[async_trait]
    impl NodeNormalizer for MockNormalizer {
        async fn get_normalized_nodes(
            &self,
            _env: Environment,
            _curies: &[String],
        ) -> Result<Value, GatewayError> {
            Ok(self.answer.clone())
        }
    }

    fn no_normalization() -> Arc<MockNormalizer> {
        Arc::new(MockNormalizer { answer: json!({}) })
    }

    fn treats_case() -> TestCase {
        TestCase::new("TestCase_1", Environment::Ci)
            .with_components(vec![Component::Ars, Component::Ara])
            .with_input("MONDO:0010794", "biolink:Disease")
            .with_predicate("biolink:treats")
            .with_asset(TestAsset::new(
                "Asset_1",
                "",
                "",
                Expectation::output("DRUGBANK:DB00313", ExpectedOutput::NeverShow),
            ))
            .with_asset(TestAsset::new(
                "Asset_2",
                "",
                "",
                Expectation::output("CHEBI:1", ExpectedOutput::TopAnswer),
            ))
    }

    fn registry() -> Registry {
        Registry::new()
            .with_participant(
                "staging",
                Participant::new("infores:ars", "http://ars", Component::Ars),
            )
            .with_participant(
                "staging",
                Participant::new("infores:aragorn", "http://aragorn", Component::Ara),
            )
    }

    fn hub_gateway() -> ScriptedGateway {
        ScriptedGateway::new()
            .on_post("http://ars/ars/api/submit", Ok(HttpReply::ok(json!({"pk": "P"}))))
            .on_get(
                "http://ars/ars/api/messages/P?trace=y",
                Ok(HttpReply::ok(json!({"children": []}))),
            )
            .on_get(
                "http://ars/ars/api/messages/P?trace=y",
                Ok(HttpReply::ok(json!({"status": "Done", "merged_version": "M1"}))),
            )
            .on_get(
                "http://ars/ars/api/messages/M1",
                Ok(HttpReply::ok(json!({
                    "fields": {"data": {"message": {"results": []}}, "code": 200}
                }))),
            )
    }

    fn binding_result(subject: &str) -> Value {
        json!({
            "node_bindings": {"SN": [{"id": subject}], "ON": [{"id": "MONDO:0010794"}]},
            "analyses": [{"score": 0.9}]
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_assets_sharing_a_query_are_dispatched_once() {
        let gateway = Arc::new(hub_gateway().on_post(
            "http://aragorn/query",
            Ok(HttpReply::ok(json!({"message": {"results": [binding_result("CHEBI:1")]}}))),
        ));
        let use_case =
            RunTestCaseUseCase::new(Arc::clone(&gateway), no_normalization(), DispatchParams::default());

        let report = use_case.execute(&treats_case(), &registry()).await;

        assert_eq!(gateway.calls("http://aragorn/query"), 1);
        assert_eq!(gateway.calls("http://ars/ars/api/submit"), 1);
        assert_eq!(report.assets.len(), 2);
        assert_eq!(report.assets[0].results["aragorn"].status, AgentStatus::Passed);
        assert_eq!(report.assets[1].results["aragorn"].status, AgentStatus::Passed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merged_hub_message_without_results_is_no_results() {
        let gateway = Arc::new(hub_gateway().on_post(
            "http://aragorn/query",
            Ok(HttpReply::ok(json!({"message": {"results": []}}))),
        ));
        let use_case = RunTestCaseUseCase::new(gateway, no_normalization(), DispatchParams::default());

        let report = use_case.execute(&treats_case(), &registry()).await;

        let asset = &report.assets[0];
        assert_eq!(asset.pks["ars"], "M1");
        assert_eq!(asset.results["ars"].status, AgentStatus::NoResults);
        assert_eq!(asset.results["ars"].message.as_deref(), Some("No results"));
        assert_eq!(asset.status, AssetStatus::Failed);
    }

    #[tokio::test]
    async fn test_output_curie_is_normalized_before_scoring() {
        let gateway = Arc::new(ScriptedGateway::new().on_post(
            "http://aragorn/query",
            Ok(HttpReply::ok(json!({"message": {"results": [binding_result("CHEBI:39867")]}}))),
        ));
        let normalizer = Arc::new(MockNormalizer {
            answer: json!({
                "DRUGBANK:DB00313": {"id": {"identifier": "CHEBI:39867"}, "type": ["biolink:SmallMolecule"]}
            }),
        });
        let case = treats_case().with_components(vec![Component::Ara]);
        let use_case = RunTestCaseUseCase::new(gateway, normalizer, DispatchParams::default());

        let report = use_case.execute(&case, &registry()).await;

        // NeverShow asset: the normalized curie is present, so it fails.
        assert_eq!(report.assets[0].results["aragorn"].status, AgentStatus::Failed);
        assert_eq!(report.assets[0].status, AssetStatus::Failed);
    }

    #[tokio::test]
    async fn test_generation_error_skips_only_that_asset() {
        let gateway = Arc::new(ScriptedGateway::new().on_post(
            "http://aragorn/query",
            Ok(HttpReply::ok(json!({"message": {"results": [binding_result("CHEBI:1")]}}))),
        ));
        let case = treats_case()
            .with_components(vec![Component::Ara])
            .with_asset(TestAsset::new(
                "Asset_3",
                "",
                "biolink:causes",
                Expectation::output("CHEBI:2", ExpectedOutput::Acceptable),
            ));
        let use_case = RunTestCaseUseCase::new(gateway, no_normalization(), DispatchParams::default());

        let report = use_case.execute(&case, &registry()).await;

        assert_eq!(report.assets[2].status, AssetStatus::Skipped);
        assert_eq!(
            report.assets[2].message.as_deref(),
            Some("Unsupported predicate: biolink:causes")
        );
        assert_eq!(report.assets[1].status, AssetStatus::Passed);
    }

    #[tokio::test]
    async fn test_unknown_objective_fails_every_asset() {
        let gateway = Arc::new(ScriptedGateway::new());
        let case = treats_case().with_objective("BenchmarkTest");
        let use_case =
            RunTestCaseUseCase::new(Arc::clone(&gateway), no_normalization(), DispatchParams::default());

        let report = use_case.execute(&case, &registry()).await;

        assert!(report
            .assets
            .iter()
            .all(|a| a.status == AssetStatus::Failed
                && a.message.as_deref() == Some("Unsupported test type")));
        assert_eq!(gateway.calls("http://aragorn/query"), 0);
    }
}
