//! Fan-out state for one query payload.

use super::response::AgentResponse;
use serde::Serialize;
use std::collections::BTreeMap;

/// Key under which the hub's own parent handle is stored in `pks`.
pub const PARENT_PK: &str = "parent_pk";

/// Value stored for a hub handle that was never produced.
pub const MISSING_PK: &str = "None";

/// Handles and raw responses collected for one payload.
///
/// Keyed by agent id. Merging is plain map insertion, so the order in which
/// participants finish does not matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchRecord {
    pub pks: BTreeMap<String, String>,
    pub responses: BTreeMap<String, AgentResponse>,
}

impl DispatchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_response(&mut self, agent: impl Into<String>, response: AgentResponse) {
        self.responses.insert(agent.into(), response);
    }

    pub fn insert_pk(&mut self, agent: impl Into<String>, pk: impl Into<String>) {
        self.pks.insert(agent.into(), pk.into());
    }

    pub fn merge(&mut self, other: DispatchRecord) {
        self.pks.extend(other.pks);
        self.responses.extend(other.responses);
    }

    pub fn parent_pk(&self) -> Option<&str> {
        self.pks.get(PARENT_PK).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// What dispatching one payload produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PayloadOutcome {
    /// Per-agent responses (possibly none).
    Dispatched(DispatchRecord),
    /// The payload failed as a whole; the error applies to every agent.
    Failed { error: String },
}

impl PayloadOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        PayloadOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn record(&self) -> Option<&DispatchRecord> {
        match self {
            PayloadOutcome::Dispatched(record) => Some(record),
            PayloadOutcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::response::empty_results;

    #[test]
    fn test_merge_is_order_independent() {
        let mut a = DispatchRecord::new();
        a.insert_response("aragorn", AgentResponse::new(200, empty_results()));
        let mut b = DispatchRecord::new();
        b.insert_response("arax", AgentResponse::timed_out());
        b.insert_pk(PARENT_PK, "abc");

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(ab, ba);
        assert_eq!(ab.parent_pk(), Some("abc"));
        assert_eq!(ab.responses.len(), 2);
    }

    #[test]
    fn test_failed_outcome_has_no_record() {
        let outcome = PayloadOutcome::failed("task panicked");
        assert!(outcome.record().is_none());
    }
}
