//! Normalize Curies use case
//!
//! Best-effort identity resolution: every requested curie comes back, mapped
//! to itself when the service has no match or cannot be reached.

use crate::ports::node_normalizer::NodeNormalizer;
use harness_domain::{Environment, NormalizedCurie, NormalizedCuries};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, warn};

pub struct NormalizeCuriesUseCase<N: NodeNormalizer + 'static> {
    normalizer: Arc<N>,
}

impl<N: NodeNormalizer + 'static> NormalizeCuriesUseCase<N> {
    pub fn new(normalizer: Arc<N>) -> Self {
        Self { normalizer }
    }

    /// Resolve `curies` for `env`. Never fails; the result is keyed by every input.
    pub async fn execute(&self, env: Environment, curies: &BTreeSet<String>) -> NormalizedCuries {
        if curies.is_empty() {
            return NormalizedCuries::new();
        }
        let request: Vec<String> = curies.iter().cloned().collect();
        match self.normalizer.get_normalized_nodes(env, &request).await {
            Ok(answer) => parse_answer(curies, &answer),
            Err(e) => {
                error!("Node norm failed with: {}", e);
                error!("Using original curies.");
                NormalizedCuries::identity(curies)
            }
        }
    }
}

/// Read `{curie: null | {id: {identifier}, type: [...]}}`.
fn parse_answer(curies: &BTreeSet<String>, answer: &Value) -> NormalizedCuries {
    let mut normalized = NormalizedCuries::new();
    for curie in curies {
        let entry = answer.get(curie).filter(|attrs| !attrs.is_null());
        let identifier = entry
            .and_then(|attrs| attrs.pointer("/id/identifier"))
            .and_then(Value::as_str);
        match (entry, identifier) {
            (Some(attrs), Some(identifier)) => {
                let categories = attrs
                    .get("type")
                    .and_then(Value::as_array)
                    .map(|types| {
                        types
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                normalized.insert(
                    curie.as_str(),
                    NormalizedCurie {
                        identifier: identifier.to_string(),
                        categories,
                    },
                );
            }
            _ => {
                warn!("Unable to normalize {}, keeping original curie", curie);
                normalized.insert(curie.as_str(), NormalizedCurie::identity(curie));
            }
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::participant_gateway::GatewayError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockNormalizer {
        answer: Result<Value, GatewayError>,
        requests: Mutex<Vec<Vec<String>>>,
    }

    impl MockNormalizer {
        fn new(answer: Result<Value, GatewayError>) -> Self {
            Self {
                answer,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NodeNormalizer for MockNormalizer {
        async fn get_normalized_nodes(
            &self,
            _env: Environment,
            curies: &[String],
        ) -> Result<Value, GatewayError> {
            self.requests.lock().unwrap().push(curies.to_vec());
            self.answer.clone()
        }
    }

    fn curies(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolves_and_keeps_unknown() {
        let normalizer = Arc::new(MockNormalizer::new(Ok(json!({
            "DRUGBANK:DB00313": {
                "id": {"identifier": "CHEBI:39867", "label": "valproic acid"},
                "type": ["biolink:SmallMolecule", "biolink:ChemicalEntity"]
            },
            "MONDO:0010794": null
        }))));
        let use_case = NormalizeCuriesUseCase::new(Arc::clone(&normalizer));
        let input = curies(&["DRUGBANK:DB00313", "MONDO:0010794", "FAKE:1"]);

        let normalized = use_case.execute(Environment::Ci, &input).await;

        assert_eq!(normalized.resolve("DRUGBANK:DB00313"), "CHEBI:39867");
        assert_eq!(
            normalized.get("DRUGBANK:DB00313").unwrap().categories[0],
            "biolink:SmallMolecule"
        );
        assert_eq!(normalized.resolve("MONDO:0010794"), "MONDO:0010794");
        assert_eq!(
            normalized.keys(),
            input.iter().map(String::as_str).collect::<BTreeSet<_>>()
        );
        assert_eq!(normalizer.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_identity() {
        let normalizer = Arc::new(MockNormalizer::new(Err(GatewayError::ConnectionError(
            "unreachable".to_string(),
        ))));
        let use_case = NormalizeCuriesUseCase::new(normalizer);
        let input = curies(&["A:1", "B:2", "C:3"]);

        let normalized = use_case.execute(Environment::Prod, &input).await;

        assert_eq!(normalized.len(), 3);
        for curie in &input {
            assert_eq!(&normalized.resolve(curie), curie);
        }
    }

    #[tokio::test]
    async fn test_unexpected_answer_shape_degrades_per_curie() {
        let normalizer = Arc::new(MockNormalizer::new(Ok(json!({"A:1": {"id": "not-an-object"}}))));
        let normalized = NormalizeCuriesUseCase::new(normalizer)
            .execute(Environment::Dev, &curies(&["A:1"]))
            .await;
        assert_eq!(normalized.resolve("A:1"), "A:1");
    }
}
