//! Participant gateway port
//!
//! Defines the interface for talking to network participants over HTTP.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to a participant
///
/// Non-2xx replies are not errors; they come back as an [`HttpReply`]
/// carrying the status code.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One HTTP exchange: status code plus decoded JSON body.
///
/// A body that is not JSON decodes to `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status_code: u16,
    pub body: Value,
}

impl HttpReply {
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Gateway for participant communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ParticipantGateway: Send + Sync {
    /// POST a query payload.
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, GatewayError>;

    /// GET a status or message document.
    async fn get_json(&self, url: &str) -> Result<HttpReply, GatewayError>;
}
