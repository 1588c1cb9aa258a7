//! Structured query payloads and their content hash.

use crate::testing::{Expectation, TestAsset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// A participant-agnostic query request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPayload {
    pub message: QueryMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMessage {
    pub query_graph: QueryGraph,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryGraph {
    pub nodes: BTreeMap<String, QueryNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub edges: BTreeMap<String, QueryEdge>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, QueryPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl QueryNode {
    pub fn with_category(category: &str) -> Self {
        Self {
            ids: None,
            categories: vec![category.to_string()],
        }
    }

    pub fn pinned(id: &str) -> Self {
        Self {
            ids: Some(vec![id.to_string()]),
            categories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEdge {
    pub subject: String,
    pub object: String,
    pub predicates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifier_constraints: Vec<QualifierConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifierConstraint {
    pub qualifier_set: Vec<QualifierEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifierEntry {
    pub qualifier_type_id: String,
    pub qualifier_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPath {
    pub subject: String,
    pub object: String,
    pub predicates: Vec<String>,
}

impl QueryPayload {
    pub fn new(query_graph: QueryGraph) -> Self {
        Self {
            message: QueryMessage { query_graph },
        }
    }

    pub fn query_graph(&self) -> &QueryGraph {
        &self.message.query_graph
    }

    /// JSON body sent over the wire.
    pub fn to_json(&self) -> serde_json::Value {
        // Every field is a string, list or map with string keys.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Content hash identifying a distinct query.
///
/// Computed over (input id, predicate, qualifier values), plus the target for
/// path-finding assets. Assets with the same hash share one payload and one
/// dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayloadHash(String);

impl PayloadHash {
    /// Hash of an asset whose curies are already normalized.
    pub fn of(asset: &TestAsset) -> Self {
        let mut hasher = Sha256::new();
        let mut feed = |part: &str| {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        };
        feed(&asset.input_id);
        if let Expectation::Paths {
            target_input_id, ..
        } = &asset.expectation
        {
            feed(target_input_id);
        }
        feed(&asset.predicate_id);
        for qualifier in &asset.qualifiers {
            feed(&qualifier.value);
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for logs.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
