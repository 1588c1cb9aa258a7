//! Raw per-agent responses and their result-shape classification.
//!
//! A participant's body is classified once, when the response is recorded.
//! Downstream code matches on [`ResultsOutcome`] instead of inspecting JSON.

use serde::Serialize;
use serde_json::{Value, json};

/// Recorded when no real HTTP response was ever received.
pub const STATUS_NO_RESPONSE: u16 = 418;
/// Recorded when a polling budget expired before a terminal state.
pub const STATUS_TIMED_OUT: u16 = 410;

/// Shape of the result list inside a response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsOutcome {
    /// `message.results` was a list (possibly empty) or absent.
    Results(Vec<Value>),
    /// The body or result slot carried a single `error` entry.
    SingleError(String),
    /// No `message` container at all.
    MissingContainer,
}

impl ResultsOutcome {
    pub fn classify(body: &Value) -> Self {
        let Some(message) = body.get("message").filter(|m| m.is_object()) else {
            return match error_text(body) {
                Some(error) => ResultsOutcome::SingleError(error),
                None => ResultsOutcome::MissingContainer,
            };
        };
        match message.get("results") {
            None | Some(Value::Null) => ResultsOutcome::Results(Vec::new()),
            Some(Value::Array(results)) => ResultsOutcome::Results(results.clone()),
            Some(other) => match error_text(other) {
                Some(error) => ResultsOutcome::SingleError(error),
                None => ResultsOutcome::MissingContainer,
            },
        }
    }
}

fn error_text(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One agent's raw outcome: status code plus body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResponse {
    pub status_code: u16,
    #[serde(rename = "response")]
    pub body: Value,
    #[serde(skip)]
    outcome: ResultsOutcome,
}

impl AgentResponse {
    pub fn new(status_code: u16, body: Value) -> Self {
        let outcome = ResultsOutcome::classify(&body);
        Self {
            status_code,
            body,
            outcome,
        }
    }

    /// The request never produced a real response.
    pub fn no_response() -> Self {
        Self::new(STATUS_NO_RESPONSE, Value::Null)
    }

    /// A polling budget ran out.
    pub fn timed_out() -> Self {
        Self::new(STATUS_TIMED_OUT, empty_results())
    }

    /// Response carried inside a hub message (`fields.code`, `fields.data`).
    ///
    /// Missing code means the hub never produced one (410); missing data is
    /// an empty result list.
    pub fn from_hub_message(message: &Value) -> Self {
        let fields = message.get("fields");
        let status_code = fields
            .and_then(|f| f.get("code"))
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(STATUS_TIMED_OUT);
        let body = fields
            .and_then(|f| f.get("data"))
            .filter(|data| !data.is_null())
            .cloned()
            .unwrap_or_else(empty_results);
        Self::new(status_code, body)
    }

    pub fn outcome(&self) -> &ResultsOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_timed_out(&self) -> bool {
        self.status_code == STATUS_TIMED_OUT
    }
}

/// `{"message": {"results": []}}`
pub fn empty_results() -> Value {
    json!({"message": {"results": []}})
}
