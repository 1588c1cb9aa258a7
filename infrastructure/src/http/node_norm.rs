//! Node normalization service client.

use super::{map_reqwest_error, read_json};
use async_trait::async_trait;
use harness_application::{GatewayError, NodeNormalizer};
use harness_domain::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Base URL of the node normalizer per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeNormUrls {
    pub dev: String,
    pub ci: String,
    pub test: String,
    pub prod: String,
}

impl Default for NodeNormUrls {
    fn default() -> Self {
        Self {
            dev: "https://nodenormalization-sri.renci.org/1.4".to_string(),
            ci: "https://nodenorm.ci.transltr.io".to_string(),
            test: "https://nodenorm.test.transltr.io/1.4".to_string(),
            prod: "https://nodenorm.transltr.io/1.4".to_string(),
        }
    }
}

impl NodeNormUrls {
    pub fn for_env(&self, env: Environment) -> &str {
        let url = match env {
            Environment::Dev => &self.dev,
            Environment::Ci => &self.ci,
            Environment::Test => &self.test,
            Environment::Prod => &self.prod,
        };
        url.trim_end_matches('/')
    }
}

pub struct NodeNormClient {
    client: reqwest::Client,
    urls: NodeNormUrls,
}

impl NodeNormClient {
    pub fn new(urls: NodeNormUrls, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, urls })
    }

    pub fn endpoint(&self, env: Environment) -> String {
        format!("{}/get_normalized_nodes", self.urls.for_env(env))
    }
}

/// One batched request, with drug/chemical conflation on.
fn request_body(curies: &[String]) -> Value {
    json!({
        "curies": curies,
        "conflate": true,
        "drug_chemical_conflate": true,
    })
}

#[async_trait]
impl NodeNormalizer for NodeNormClient {
    async fn get_normalized_nodes(
        &self,
        env: Environment,
        curies: &[String],
    ) -> Result<Value, GatewayError> {
        let url = self.endpoint(env);
        debug!("Normalizing {} curies via {}", curies.len(), url);
        let response = self
            .client
            .post(&url)
            .json(&request_body(curies))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "node norm returned {}",
                status.as_u16()
            )));
        }
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_per_environment() {
        let client = NodeNormClient::new(NodeNormUrls::default(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(Environment::Ci),
            "https://nodenorm.ci.transltr.io/get_normalized_nodes"
        );
        assert_eq!(
            client.endpoint(Environment::Prod),
            "https://nodenorm.transltr.io/1.4/get_normalized_nodes"
        );
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let urls = NodeNormUrls {
            dev: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(urls.for_env(Environment::Dev), "http://localhost:8080");
    }

    #[test]
    fn test_request_enables_conflation() {
        let body = request_body(&["MONDO:1".to_string()]);
        assert_eq!(body["curies"], json!(["MONDO:1"]));
        assert_eq!(body["conflate"], json!(true));
        assert_eq!(body["drug_chemical_conflate"], json!(true));
    }
}
