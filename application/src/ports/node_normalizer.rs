//! Node normalizer port
//!
//! Identity resolution for curies.

use super::participant_gateway::GatewayError;
use async_trait::async_trait;
use harness_domain::Environment;
use serde_json::Value;

#[async_trait]
pub trait NodeNormalizer: Send + Sync {
    /// One batched lookup with conflation enabled.
    ///
    /// Returns the service's raw answer: each requested curie maps to `null`
    /// or to `{"id": {"identifier": ...}, "type": [...]}`.
    async fn get_normalized_nodes(
        &self,
        env: Environment,
        curies: &[String],
    ) -> Result<Value, GatewayError>;
}
