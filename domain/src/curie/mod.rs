//! Canonical identifiers returned by the identity-resolution service.

use crate::testing::TestAsset;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Canonical form of one curie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedCurie {
    pub identifier: String,
    /// Most specific category first, as the service returns them.
    pub categories: Vec<String>,
}

impl NormalizedCurie {
    pub fn identity(curie: &str) -> Self {
        Self {
            identifier: curie.to_string(),
            categories: Vec::new(),
        }
    }
}

/// Input curie → canonical curie. Always keyed by every requested curie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedCuries(BTreeMap<String, NormalizedCurie>);

impl NormalizedCuries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every curie maps to itself.
    pub fn identity<'a>(curies: impl IntoIterator<Item = &'a String>) -> Self {
        Self(
            curies
                .into_iter()
                .map(|curie| (curie.clone(), NormalizedCurie::identity(curie)))
                .collect(),
        )
    }

    pub fn insert(&mut self, curie: impl Into<String>, normalized: NormalizedCurie) {
        self.0.insert(curie.into(), normalized);
    }

    pub fn get(&self, curie: &str) -> Option<&NormalizedCurie> {
        self.0.get(curie)
    }

    /// Canonical identifier, or the curie itself when unknown.
    pub fn resolve(&self, curie: &str) -> String {
        self.get(curie)
            .map(|n| n.identifier.clone())
            .unwrap_or_else(|| curie.to_string())
    }

    /// Rewrite an asset's input and expected curies to canonical form.
    ///
    /// A missing input category is taken from the normalized input.
    pub fn apply(&self, asset: &TestAsset) -> TestAsset {
        let mut normalized = asset.clone();
        normalized.input_id = self.resolve(&asset.input_id);
        normalized.expectation = asset.expectation.map_curies(|curie| self.resolve(curie));
        if normalized.input_category.is_none() {
            normalized.input_category = self
                .get(&asset.input_id)
                .and_then(|n| n.categories.first().cloned());
        }
        normalized
    }

    pub fn keys(&self) -> BTreeSet<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
