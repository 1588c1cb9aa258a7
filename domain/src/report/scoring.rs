//! Pass/fail scoring of a resolved result list against an expectation.

use super::agent_report::{ActualOutput, AgentStatus};
use crate::testing::{Expectation, ExpectedOutput, PathNode};
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

/// Results inspected for a `TopAnswer` expectation.
pub const TOP_ANSWER_WINDOW: usize = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Malformed result: {0}")]
    MalformedResult(String),
}

/// Verdict for one agent's results.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub status: AgentStatus,
    pub actual_output: Option<ActualOutput>,
    pub expected_nodes_found: Option<String>,
}

impl Scored {
    fn new(status: AgentStatus) -> Self {
        Self {
            status,
            actual_output: None,
            expected_nodes_found: None,
        }
    }

    fn with_output(mut self, output: ActualOutput) -> Self {
        self.actual_output = Some(output);
        self
    }
}

/// Score `results` (and the enclosing `message` for path-finding) against an expectation.
pub fn score(
    expectation: &Expectation,
    message: &Value,
    results: &[Value],
) -> Result<Scored, ScoringError> {
    match expectation {
        Expectation::Output {
            output_id,
            expected_output,
        } => score_acceptance(results, output_id, *expected_output),
        Expectation::Paths {
            path_nodes,
            minimum_required_path_nodes,
            ..
        } => score_pathfinder(message, path_nodes, *minimum_required_path_nodes),
    }
}

fn malformed(what: impl Into<String>) -> ScoringError {
    ScoringError::MalformedResult(what.into())
}

/// Node-binding lists of one result, keyed by query node.
fn node_bindings(result: &Value) -> Result<Vec<Vec<&str>>, ScoringError> {
    let bindings = result
        .get("node_bindings")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("result without node_bindings"))?;
    bindings
        .values()
        .map(|binding| {
            binding
                .as_array()
                .ok_or_else(|| malformed("node binding is not a list"))?
                .iter()
                .map(|entry| {
                    entry
                        .get("id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| malformed("node binding without id"))
                })
                .collect()
        })
        .collect()
}

fn ids_in(results: &[Value]) -> Result<BTreeSet<&str>, ScoringError> {
    let mut ids = BTreeSet::new();
    for result in results {
        for binding in node_bindings(result)? {
            ids.extend(binding);
        }
    }
    Ok(ids)
}

/// Rank and score of the first result binding `curie`.
///
/// The first (best ranked) match is reported, not the last. Hub results
/// carry `sugeno` and `rank`; agent results are ranked by position and
/// scored by their last analysis, so they must carry `analyses`.
fn locate(results: &[Value], curie: &str) -> Result<Option<ActualOutput>, ScoringError> {
    for (index, result) in results.iter().enumerate() {
        let hit = node_bindings(result)?
            .iter()
            .any(|binding| binding.last() == Some(&curie));
        if !hit {
            continue;
        }
        let hub_rank = result.get("rank").and_then(Value::as_u64);
        let hub_score = result.get("sugeno").and_then(Value::as_f64);
        let output = match (hub_rank, hub_score) {
            (Some(rank), Some(score)) => ActualOutput::new(rank as usize, Some(score)),
            _ => {
                let analyses = result
                    .get("analyses")
                    .and_then(Value::as_array)
                    .ok_or_else(|| malformed("result without analyses"))?;
                let score = analyses
                    .last()
                    .and_then(|analysis| analysis.get("score"))
                    .and_then(Value::as_f64);
                ActualOutput::new(index + 1, score)
            }
        };
        return Ok(Some(output));
    }
    Ok(None)
}

/// Rank/percentile comparison for an output expectation.
pub fn score_acceptance(
    results: &[Value],
    output_curie: &str,
    expected: ExpectedOutput,
) -> Result<Scored, ScoringError> {
    let half = results.len() / 2;
    let window = match expected {
        ExpectedOutput::TopAnswer => &results[..results.len().min(TOP_ANSWER_WINDOW)],
        ExpectedOutput::Acceptable => &results[..half],
        ExpectedOutput::BadButForgivable => &results[half..],
        ExpectedOutput::NeverShow => results,
    };
    let all_ids = ids_in(results)?;
    let in_window = ids_in(window)?.contains(output_curie);
    let anywhere = all_ids.contains(output_curie);
    let located = locate(results, output_curie)?;
    let found = || Scored::new(AgentStatus::Passed).with_output(located.clone().unwrap_or_default());

    let scored = match expected {
        ExpectedOutput::TopAnswer | ExpectedOutput::Acceptable => {
            if in_window {
                found()
            } else if anywhere {
                Scored {
                    status: AgentStatus::Failed,
                    ..found()
                }
            } else {
                Scored::new(AgentStatus::Failed).with_output(ActualOutput::absent())
            }
        }
        ExpectedOutput::BadButForgivable => {
            if in_window {
                found()
            } else if anywhere {
                Scored {
                    status: AgentStatus::Failed,
                    ..found()
                }
            } else {
                Scored::new(AgentStatus::Passed).with_output(ActualOutput::absent())
            }
        }
        ExpectedOutput::NeverShow => {
            if in_window {
                Scored {
                    status: AgentStatus::Failed,
                    ..found()
                }
            } else {
                Scored::new(AgentStatus::Passed).with_output(ActualOutput::absent())
            }
        }
    };
    Ok(scored)
}

/// Path-finding check: does any returned path touch enough expected nodes?
pub fn score_pathfinder(
    message: &Value,
    path_nodes: &[PathNode],
    minimum_required: usize,
) -> Result<Scored, ScoringError> {
    let analyses = message
        .pointer("/results/0/analyses")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("first result has no analyses"))?;
    let aux_graphs = message
        .get("auxiliary_graphs")
        .ok_or_else(|| malformed("message has no auxiliary_graphs"))?;
    let kg_edges = message
        .pointer("/knowledge_graph/edges")
        .ok_or_else(|| malformed("message has no knowledge_graph edges"))?;

    let mut found = BTreeSet::new();
    let mut unmatched = BTreeSet::new();

    for analysis in analyses {
        let Some(path_bindings) = analysis.get("path_bindings").and_then(Value::as_object) else {
            continue;
        };
        for binding in path_bindings.values().filter_map(Value::as_array).flatten() {
            let path_id = binding
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed("path binding without id"))?;
            let edge_ids = aux_graphs
                .get(path_id)
                .and_then(|graph| graph.get("edges"))
                .and_then(Value::as_array)
                .ok_or_else(|| malformed(format!("unknown auxiliary graph {}", path_id)))?;

            let mut matching: BTreeSet<&str> = BTreeSet::new();
            for edge_id in edge_ids.iter().filter_map(Value::as_str) {
                let edge = kg_edges
                    .get(edge_id)
                    .ok_or_else(|| malformed(format!("unknown edge {}", edge_id)))?;
                let subject = edge.get("subject").and_then(Value::as_str);
                let object = edge.get("object").and_then(Value::as_str);
                for node in path_nodes {
                    let already_hit = node.ids.iter().any(|id| matching.contains(id.as_str()));
                    if already_hit {
                        continue;
                    }
                    if let Some(end) = [subject, object]
                        .into_iter()
                        .flatten()
                        .find(|end| node.ids.iter().any(|id| id.as_str() == *end))
                    {
                        matching.insert(end);
                    }
                }
            }

            let joined = matching.iter().copied().collect::<Vec<_>>().join(",");
            if matching.len() >= minimum_required {
                found.insert(joined);
            } else if !matching.is_empty() {
                unmatched.insert(joined);
            }
        }
    }

    let join = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join("; ");
    let scored = if !found.is_empty() {
        Scored {
            expected_nodes_found: Some(join(&found)),
            ..Scored::new(AgentStatus::Passed)
        }
    } else if !unmatched.is_empty() {
        Scored {
            expected_nodes_found: Some(join(&unmatched)),
            ..Scored::new(AgentStatus::Failed)
        }
    } else {
        Scored::new(AgentStatus::Failed)
    };
    Ok(scored)
}
