//! Builds the structured query for a test asset.
//!
//! Template selection is by predicate. Each template has a fixed node/edge
//! shape and a list of nodes the input curie may be pinned to; the pinned
//! node is chosen by the asset's input category.

use super::payload::{
    QualifierConstraint, QualifierEntry, QueryEdge, QueryGraph, QueryNode, QueryPath, QueryPayload,
};
use crate::testing::{
    Expectation, OBJECT_ASPECT_QUALIFIER, OBJECT_DIRECTION_QUALIFIER, TestAsset,
};
use thiserror::Error;

pub const TREATS: &str = "biolink:treats";
pub const AFFECTS: &str = "biolink:affects";
pub const RELATED_TO: &str = "biolink:related_to";

const DISEASE: &str = "biolink:Disease";
const GENE: &str = "biolink:Gene";
const CHEMICAL_ENTITY: &str = "biolink:ChemicalEntity";

const SUBJECT_NODE: &str = "SN";
const OBJECT_NODE: &str = "ON";
const EDGE: &str = "t_edge";

/// Why a query could not be built for an asset. The asset is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    #[error("Unsupported input category for {predicate}: {category}")]
    UnsupportedInputCategory { predicate: String, category: String },

    #[error("Missing input category for {0}")]
    MissingInputCategory(String),

    #[error("Missing input id")]
    MissingInputId,
}

/// Fixed shape of a one-hop query.
struct OneHopTemplate {
    predicate: &'static str,
    subject_category: &'static str,
    object_category: &'static str,
    /// Nodes the input curie may be pinned to, in preference order.
    pinnable: &'static [&'static str],
    qualified: bool,
}

const TEMPLATES: &[OneHopTemplate] = &[
    OneHopTemplate {
        predicate: TREATS,
        subject_category: CHEMICAL_ENTITY,
        object_category: DISEASE,
        pinnable: &[OBJECT_NODE],
        qualified: false,
    },
    OneHopTemplate {
        predicate: AFFECTS,
        subject_category: CHEMICAL_ENTITY,
        object_category: GENE,
        pinnable: &[SUBJECT_NODE, OBJECT_NODE],
        qualified: true,
    },
];

impl OneHopTemplate {
    fn find(predicate: &str) -> Option<&'static OneHopTemplate> {
        TEMPLATES.iter().find(|t| t.predicate == predicate)
    }

    fn category_of(&self, node: &str) -> &'static str {
        if node == SUBJECT_NODE {
            self.subject_category
        } else {
            self.object_category
        }
    }

    fn build(&self, asset: &TestAsset) -> Result<QueryPayload, GenerationError> {
        let category = asset
            .input_category
            .as_deref()
            .ok_or_else(|| GenerationError::MissingInputCategory(self.predicate.to_string()))?;
        let pinned = self
            .pinnable
            .iter()
            .copied()
            .find(|node| self.category_of(node) == category)
            .ok_or_else(|| GenerationError::UnsupportedInputCategory {
                predicate: self.predicate.to_string(),
                category: category.to_string(),
            })?;

        let mut graph = QueryGraph::default();
        for node in [SUBJECT_NODE, OBJECT_NODE] {
            let mut query_node = QueryNode::with_category(self.category_of(node));
            if node == pinned {
                query_node.ids = Some(vec![asset.input_id.clone()]);
            }
            graph.nodes.insert(node.to_string(), query_node);
        }

        let qualifier_constraints = if self.qualified {
            vec![QualifierConstraint {
                qualifier_set: vec![
                    QualifierEntry {
                        qualifier_type_id: "biolink:object_aspect_qualifier".to_string(),
                        qualifier_value: asset
                            .qualifier(OBJECT_ASPECT_QUALIFIER)
                            .unwrap_or_default()
                            .to_string(),
                    },
                    QualifierEntry {
                        qualifier_type_id: "biolink:object_direction_qualifier".to_string(),
                        qualifier_value: asset
                            .qualifier(OBJECT_DIRECTION_QUALIFIER)
                            .unwrap_or_default()
                            .to_string(),
                    },
                ],
            }]
        } else {
            Vec::new()
        };

        graph.edges.insert(
            EDGE.to_string(),
            QueryEdge {
                subject: SUBJECT_NODE.to_string(),
                object: OBJECT_NODE.to_string(),
                predicates: vec![self.predicate.to_string()],
                knowledge_type: inferred_hint(asset),
                qualifier_constraints,
            },
        );

        Ok(QueryPayload::new(graph))
    }
}

fn inferred_hint(asset: &TestAsset) -> Option<String> {
    asset.wants_inferred().then(|| "inferred".to_string())
}

/// Two pinned endpoints joined by an unconstrained path.
fn build_pathfinder(asset: &TestAsset, target: &str) -> QueryPayload {
    let predicate = if asset.predicate_id.is_empty() {
        RELATED_TO
    } else {
        asset.predicate_id.as_str()
    };
    let mut graph = QueryGraph::default();
    graph
        .nodes
        .insert("n0".to_string(), QueryNode::pinned(&asset.input_id));
    graph.nodes.insert("n1".to_string(), QueryNode::pinned(target));
    graph.paths.insert(
        "p0".to_string(),
        QueryPath {
            subject: "n0".to_string(),
            object: "n1".to_string(),
            predicates: vec![predicate.to_string()],
        },
    );
    QueryPayload::new(graph)
}

/// Build the query payload for one asset.
///
/// Pure: the same asset always yields the same payload. Curies are expected
/// to be normalized already.
pub fn generate_query(asset: &TestAsset) -> Result<QueryPayload, GenerationError> {
    if asset.input_id.is_empty() {
        return Err(GenerationError::MissingInputId);
    }
    match &asset.expectation {
        Expectation::Paths {
            target_input_id, ..
        } => Ok(build_pathfinder(asset, target_input_id)),
        Expectation::Output { .. } => OneHopTemplate::find(&asset.predicate_id)
            .ok_or_else(|| GenerationError::UnsupportedPredicate(asset.predicate_id.clone()))?
            .build(asset),
    }
}
