//! Raw participant response → [`AgentReport`].

use super::agent_report::{AgentReport, AgentStatus, NO_RESULTS, TEST_ERROR, TIMED_OUT};
use super::scoring::score;
use crate::dispatch::{AgentResponse, ResultsOutcome};
use crate::testing::Expectation;
use serde_json::Value;

/// Normalize one agent's raw response against an asset's expectation.
///
/// First match wins: error status, malformed body, empty results, scoring.
/// Never fails; anything uninterpretable becomes `FAILED` / "Test Error".
pub fn normalize_response(response: &AgentResponse, expectation: &Expectation) -> AgentReport {
    if response.status_code > 299 {
        let message = if response.is_timed_out() {
            TIMED_OUT.to_string()
        } else {
            format!("Status code: {}", response.status_code)
        };
        return AgentReport::failed(message);
    }

    let results = match response.outcome() {
        ResultsOutcome::Results(results) => results,
        ResultsOutcome::SingleError(_) | ResultsOutcome::MissingContainer => {
            return AgentReport::failed(TEST_ERROR);
        }
    };
    if results.is_empty() {
        return AgentReport::new(AgentStatus::NoResults).with_message(NO_RESULTS);
    }

    let message = response.body.get("message").unwrap_or(&Value::Null);
    match score(expectation, message, results) {
        Ok(scored) => {
            let mut report =
                AgentReport::new(scored.status).with_actual_output(scored.actual_output);
            report.expected_nodes_found = scored.expected_nodes_found;
            report
        }
        Err(_) => AgentReport::failed(TEST_ERROR),
    }
}
