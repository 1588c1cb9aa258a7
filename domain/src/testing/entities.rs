//! Test cases and the assets (expected outputs) they carry.
//!
//! These are deserialized straight from the declarative test-suite JSON and
//! stay immutable for the length of a run.

use super::value_objects::{Component, Environment, ExpectedOutput, TestObjective};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Qualifier parameter carrying the object aspect (e.g. `activity_or_abundance`).
pub const OBJECT_ASPECT_QUALIFIER: &str = "biolink_object_aspect_qualifier";
/// Qualifier parameter carrying the object direction (e.g. `increased`).
pub const OBJECT_DIRECTION_QUALIFIER: &str = "biolink_object_direction_qualifier";

/// Runner setting requesting inferred (creative-mode) queries.
pub const INFERRED_SETTING: &str = "inferred";

/// Suite files write `null` for empty lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One qualifier key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub parameter: String,
    pub value: String,
}

impl Qualifier {
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// A group of equivalent curies, any one of which satisfies a path position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ids: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PathNode {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids, name: None }
    }
}

fn default_minimum_path_nodes() -> usize {
    1
}

/// What a single asset expects to see in a participant's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expectation {
    /// Path-finding: intermediate nodes that should appear between input and target.
    Paths {
        target_input_id: String,
        #[serde(deserialize_with = "null_as_empty")]
        path_nodes: Vec<PathNode>,
        #[serde(default = "default_minimum_path_nodes")]
        minimum_required_path_nodes: usize,
    },
    /// One output curie placed in a quality bucket.
    Output {
        output_id: String,
        expected_output: ExpectedOutput,
    },
}

impl Expectation {
    pub fn output(output_id: impl Into<String>, expected_output: ExpectedOutput) -> Self {
        Expectation::Output {
            output_id: output_id.into(),
            expected_output,
        }
    }

    pub fn expected_output(&self) -> Option<ExpectedOutput> {
        match self {
            Expectation::Output {
                expected_output, ..
            } => Some(*expected_output),
            Expectation::Paths { .. } => None,
        }
    }

    /// Every curie this expectation refers to.
    pub fn curies(&self) -> Vec<&str> {
        match self {
            Expectation::Output { output_id, .. } => vec![output_id.as_str()],
            Expectation::Paths {
                target_input_id,
                path_nodes,
                ..
            } => std::iter::once(target_input_id.as_str())
                .chain(
                    path_nodes
                        .iter()
                        .flat_map(|node| node.ids.iter().map(String::as_str)),
                )
                .collect(),
        }
    }

    /// Rewrite every curie through `resolve`.
    pub fn map_curies(&self, resolve: impl Fn(&str) -> String) -> Self {
        match self {
            Expectation::Output {
                output_id,
                expected_output,
            } => Expectation::Output {
                output_id: resolve(output_id),
                expected_output: *expected_output,
            },
            Expectation::Paths {
                target_input_id,
                path_nodes,
                minimum_required_path_nodes,
            } => Expectation::Paths {
                target_input_id: resolve(target_input_id),
                path_nodes: path_nodes
                    .iter()
                    .map(|node| PathNode {
                        ids: node.ids.iter().map(|id| resolve(id)).collect(),
                        name: node.name.clone(),
                    })
                    .collect(),
                minimum_required_path_nodes: *minimum_required_path_nodes,
            },
        }
    }
}

/// One expected-output instance tied to a [`TestCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAsset {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Empty means "inherit the test case input".
    #[serde(default)]
    pub input_id: String,
    #[serde(default)]
    pub input_category: Option<String>,
    /// Empty means "inherit the test case predicate".
    #[serde(default)]
    pub predicate_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub test_runner_settings: Vec<String>,
    #[serde(flatten)]
    pub expectation: Expectation,
}

impl TestAsset {
    pub fn new(
        id: impl Into<String>,
        input_id: impl Into<String>,
        predicate_id: impl Into<String>,
        expectation: Expectation,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            input_id: input_id.into(),
            input_category: None,
            predicate_id: predicate_id.into(),
            qualifiers: Vec::new(),
            test_runner_settings: Vec::new(),
            expectation,
        }
    }

    pub fn with_input_category(mut self, category: impl Into<String>) -> Self {
        self.input_category = Some(category.into());
        self
    }

    pub fn with_qualifier(mut self, parameter: &str, value: &str) -> Self {
        self.qualifiers.push(Qualifier::new(parameter, value));
        self
    }

    pub fn with_runner_setting(mut self, setting: impl Into<String>) -> Self {
        self.test_runner_settings.push(setting.into());
        self
    }

    /// Value of the named qualifier, if the asset carries it.
    pub fn qualifier(&self, parameter: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|q| q.parameter == parameter)
            .map(|q| q.value.as_str())
    }

    pub fn wants_inferred(&self) -> bool {
        self.test_runner_settings
            .iter()
            .any(|s| s == INFERRED_SETTING)
    }

    /// Display label: name if present, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// One logical query scenario with its ordered assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub test_env: Environment,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub components: Vec<Component>,
    #[serde(default)]
    pub test_case_objective: Option<String>,
    #[serde(default)]
    pub test_case_input_id: String,
    #[serde(default)]
    pub test_case_predicate_id: String,
    #[serde(default)]
    pub input_category: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub test_runner_settings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub test_assets: Vec<TestAsset>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, test_env: Environment) -> Self {
        Self {
            id: id.into(),
            name: None,
            test_env,
            components: vec![Component::Ars],
            test_case_objective: Some("AcceptanceTest".to_string()),
            test_case_input_id: String::new(),
            test_case_predicate_id: String::new(),
            input_category: None,
            qualifiers: Vec::new(),
            test_runner_settings: Vec::new(),
            test_assets: Vec::new(),
        }
    }

    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.test_case_objective = Some(objective.into());
        self
    }

    pub fn with_input(mut self, input_id: impl Into<String>, category: impl Into<String>) -> Self {
        self.test_case_input_id = input_id.into();
        self.input_category = Some(category.into());
        self
    }

    pub fn with_predicate(mut self, predicate_id: impl Into<String>) -> Self {
        self.test_case_predicate_id = predicate_id.into();
        self
    }

    pub fn with_asset(mut self, asset: TestAsset) -> Self {
        self.test_assets.push(asset);
        self
    }

    pub fn objective(&self) -> Option<TestObjective> {
        self.test_case_objective.as_deref().map(TestObjective::parse)
    }

    /// Assets with the case-level defaults filled in.
    ///
    /// An asset inherits the case's input id, predicate, input category,
    /// qualifiers and runner settings wherever it does not override them.
    pub fn resolved_assets(&self) -> Vec<TestAsset> {
        self.test_assets
            .iter()
            .map(|asset| {
                let mut asset = asset.clone();
                if asset.input_id.is_empty() {
                    asset.input_id = self.test_case_input_id.clone();
                }
                if asset.predicate_id.is_empty() {
                    asset.predicate_id = self.test_case_predicate_id.clone();
                }
                if asset.input_category.is_none() {
                    asset.input_category = self.input_category.clone();
                }
                if asset.qualifiers.is_empty() {
                    asset.qualifiers = self.qualifiers.clone();
                }
                if asset.test_runner_settings.is_empty() {
                    asset.test_runner_settings = self.test_runner_settings.clone();
                }
                asset
            })
            .collect()
    }

    /// Every curie referenced by this case and its assets.
    pub fn curies(&self) -> BTreeSet<String> {
        let mut curies = BTreeSet::new();
        if !self.test_case_input_id.is_empty() {
            curies.insert(self.test_case_input_id.clone());
        }
        for asset in &self.test_assets {
            if !asset.input_id.is_empty() {
                curies.insert(asset.input_id.clone());
            }
            curies.extend(asset.expectation.curies().into_iter().map(str::to_string));
        }
        curies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narp_asset_json() -> serde_json::Value {
        serde_json::json!({
            "id": "Asset_3",
            "name": "Valproic_Acid_treats_NARP_Syndrome",
            "input_id": "MONDO:0010794",
            "input_category": null,
            "predicate_id": "biolink:treats",
            "output_id": "DRUGBANK:DB00313",
            "expected_output": "NeverShow",
            "qualifiers": [],
            "test_runner_settings": ["inferred"]
        })
    }

    #[test]
    fn test_deserialize_output_asset() {
        let asset: TestAsset = serde_json::from_value(narp_asset_json()).unwrap();
        assert_eq!(asset.input_id, "MONDO:0010794");
        assert!(asset.wants_inferred());
        assert_eq!(
            asset.expectation,
            Expectation::output("DRUGBANK:DB00313", ExpectedOutput::NeverShow)
        );
    }

    #[test]
    fn test_deserialize_pathfinder_asset() {
        let asset: TestAsset = serde_json::from_value(serde_json::json!({
            "id": "Path_1",
            "input_id": "CHEBI:45783",
            "predicate_id": "biolink:related_to",
            "qualifiers": null,
            "target_input_id": "MONDO:0004975",
            "path_nodes": [{"ids": ["NCBIGene:348", "UniProtKB:P02649"]}],
            "minimum_required_path_nodes": 1
        }))
        .unwrap();

        match &asset.expectation {
            Expectation::Paths {
                target_input_id,
                path_nodes,
                minimum_required_path_nodes,
            } => {
                assert_eq!(target_input_id, "MONDO:0004975");
                assert_eq!(path_nodes[0].ids.len(), 2);
                assert_eq!(*minimum_required_path_nodes, 1);
            }
            other => panic!("expected path expectation, got {:?}", other),
        }
        assert!(asset.qualifiers.is_empty());
    }

    #[test]
    fn test_resolved_assets_inherit_case_defaults() {
        let mut asset: TestAsset = serde_json::from_value(narp_asset_json()).unwrap();
        asset.input_id.clear();
        asset.test_runner_settings.clear();
        let mut case = TestCase::new("TestCase_1", Environment::Ci)
            .with_input("MONDO:0010794", "biolink:Disease")
            .with_predicate("biolink:treats")
            .with_asset(asset);
        case.test_runner_settings = vec!["inferred".to_string()];

        let resolved = case.resolved_assets();
        assert_eq!(resolved[0].input_id, "MONDO:0010794");
        assert_eq!(resolved[0].input_category.as_deref(), Some("biolink:Disease"));
        assert!(resolved[0].wants_inferred());
    }

    #[test]
    fn test_case_curies_collects_everything() {
        let case = TestCase::new("TC", Environment::Ci)
            .with_input("MONDO:1", "biolink:Disease")
            .with_asset(TestAsset::new(
                "A1",
                "MONDO:1",
                "biolink:treats",
                Expectation::output("CHEBI:1", ExpectedOutput::TopAnswer),
            ))
            .with_asset(TestAsset::new(
                "A2",
                "CHEBI:9",
                "biolink:related_to",
                Expectation::Paths {
                    target_input_id: "MONDO:2".to_string(),
                    path_nodes: vec![PathNode::new(vec!["NCBIGene:1".to_string()])],
                    minimum_required_path_nodes: 1,
                },
            ));

        let curies: Vec<_> = case.curies().into_iter().collect();
        assert_eq!(
            curies,
            vec!["CHEBI:1", "CHEBI:9", "MONDO:1", "MONDO:2", "NCBIGene:1"]
        );
    }

    #[test]
    fn test_qualifier_lookup() {
        let asset = TestAsset::new(
            "A",
            "CHEBI:1",
            "biolink:affects",
            Expectation::output("NCBIGene:1", ExpectedOutput::Acceptable),
        )
        .with_qualifier(OBJECT_DIRECTION_QUALIFIER, "increased");
        assert_eq!(asset.qualifier(OBJECT_DIRECTION_QUALIFIER), Some("increased"));
        assert_eq!(asset.qualifier(OBJECT_ASPECT_QUALIFIER), None);
    }
}
