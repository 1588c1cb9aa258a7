//! Participant gateway over `reqwest`.

use super::{map_reqwest_error, read_json};
use async_trait::async_trait;
use harness_application::{GatewayError, HttpReply, ParticipantGateway};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("translator-test-harness/", env!("CARGO_PKG_VERSION"));

/// Sends query payloads and poll requests to participants.
///
/// Query submissions and poll requests have separate per-request timeouts:
/// an answer to a query can take minutes, a status poll should not.
#[derive(Debug, Clone)]
pub struct HttpParticipantGateway {
    client: reqwest::Client,
    query_timeout: Duration,
    poll_timeout: Duration,
}

impl HttpParticipantGateway {
    pub fn new(query_timeout: Duration, poll_timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            query_timeout,
            poll_timeout,
        })
    }

    fn query_request(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        self.client.post(url).timeout(self.query_timeout).json(body)
    }

    fn poll_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).timeout(self.poll_timeout)
    }
}

#[async_trait]
impl ParticipantGateway for HttpParticipantGateway {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, GatewayError> {
        debug!("POST {}", url);
        let response = self
            .query_request(url, body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status_code = response.status().as_u16();
        Ok(HttpReply::new(status_code, read_json(response).await?))
    }

    async fn get_json(&self, url: &str) -> Result<HttpReply, GatewayError> {
        debug!("GET {}", url);
        let response = self
            .poll_request(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status_code = response.status().as_u16();
        Ok(HttpReply::new(status_code, read_json(response).await?))
    }
}
