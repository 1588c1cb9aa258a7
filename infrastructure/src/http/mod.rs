//! `reqwest` adapters for the outbound HTTP ports.

mod gateway;
mod node_norm;

pub use gateway::HttpParticipantGateway;
pub use node_norm::{NodeNormClient, NodeNormUrls};

use harness_application::GatewayError;
use serde_json::Value;

fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Decode a response body, treating anything that is not JSON as `null`.
async fn read_json(response: reqwest::Response) -> Result<Value, GatewayError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
