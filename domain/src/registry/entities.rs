//! Participant registrations grouped by maturity and role.

use crate::core::string::agent_id;
use crate::testing::{Component, Environment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Infores of the answer appraiser utility (takes `/get_appraisal`).
pub const APPRAISER_INFORES: &str = "infores:sri-answer-appraiser";
/// Infores of the node normalizer utility (takes `/get_normalized_nodes`).
pub const NODE_NORMALIZER_INFORES: &str = "infores:sri-node-normalizer";

/// One registered network participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Registry id, or the title when the registry entry has none
    pub id: String,
    pub title: String,
    /// Canonical resource identifier, e.g. `infores:aragorn`
    pub infores: String,
    /// Base URL without a trailing slash
    pub url: String,
    pub component: Component,
}

impl Participant {
    pub fn new(
        infores: impl Into<String>,
        url: impl Into<String>,
        component: Component,
    ) -> Self {
        let infores = infores.into();
        let url: String = url.into();
        Self {
            id: agent_id(&infores).to_string(),
            title: agent_id(&infores).to_string(),
            url: url.trim_end_matches('/').to_string(),
            infores,
            component,
        }
    }

    pub fn with_title(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
        self.id = id.into();
        self.title = title.into();
        self
    }

    /// Key used for this participant in dispatch records.
    pub fn agent_id(&self) -> &str {
        agent_id(&self.infores)
    }

    pub fn is_hub(&self, hub_infores: &str) -> bool {
        self.infores == hub_infores
    }

    /// Endpoint a query payload is POSTed to.
    pub fn query_url(&self, hub_infores: &str) -> String {
        if self.is_hub(hub_infores) {
            format!("{}/ars/api/submit", self.url)
        } else if self.infores == APPRAISER_INFORES {
            format!("{}/get_appraisal", self.url)
        } else if self.infores == NODE_NORMALIZER_INFORES {
            format!("{}/get_normalized_nodes", self.url)
        } else if self.url.contains("annotator") {
            self.url.clone()
        } else {
            format!("{}/query", self.url)
        }
    }
}

/// Participants keyed by maturity tag, then by role.
///
/// Populated once before fan-out and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    entries: BTreeMap<String, BTreeMap<Component, Vec<Participant>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, maturity: impl Into<String>, participant: Participant) {
        self.entries
            .entry(maturity.into())
            .or_default()
            .entry(participant.component)
            .or_default()
            .push(participant);
    }

    pub fn with_participant(mut self, maturity: impl Into<String>, participant: Participant) -> Self {
        self.insert(maturity, participant);
        self
    }

    /// Participants for an environment and role; empty when none are registered.
    pub fn participants(&self, env: Environment, component: Component) -> &[Participant] {
        self.participants_for_maturity(env.maturity(), component)
    }

    pub fn participants_for_maturity(&self, maturity: &str, component: Component) -> &[Participant] {
        self.entries
            .get(maturity)
            .and_then(|roles| roles.get(&component))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }


    /// Total number of registrations across all maturities and roles.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|roles| roles.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
