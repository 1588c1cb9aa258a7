//! Test suite file loader
//!
//! Accepts a suite object (`{"id": .., "test_cases": {id: case}}`), a bare
//! map of test cases keyed by id, or an array of test cases.

use harness_domain::TestCase;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SuiteLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid test case {id}: {source}")]
    InvalidTestCase {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a test suite, a map of test cases, or an array of test cases")]
    UnrecognizedShape,
}

/// Test cases read from one suite file.
#[derive(Debug, Clone)]
pub struct LoadedSuite {
    /// Suite id from the file, or the file stem.
    pub name: String,
    pub test_cases: Vec<TestCase>,
}

pub struct SuiteLoader;

impl SuiteLoader {
    pub fn load(path: &Path) -> Result<LoadedSuite, SuiteLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| SuiteLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| SuiteLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let fallback_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "suite".to_string());

        let suite = Self::from_value(value, &fallback_name)?;
        info!(
            "Loaded {} test cases from {} as suite {}",
            suite.test_cases.len(),
            path.display(),
            suite.name
        );
        Ok(suite)
    }

    pub fn from_value(value: Value, fallback_name: &str) -> Result<LoadedSuite, SuiteLoadError> {
        match value {
            Value::Object(mut object) if object.contains_key("test_cases") => {
                let name = object
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or(fallback_name)
                    .to_string();
                let cases = object.remove("test_cases").unwrap_or(Value::Null);
                let test_cases = match cases {
                    Value::Object(map) => parse_cases(map.into_iter())?,
                    Value::Array(list) => parse_list(list)?,
                    Value::Null => Vec::new(),
                    _ => return Err(SuiteLoadError::UnrecognizedShape),
                };
                Ok(LoadedSuite { name, test_cases })
            }
            Value::Object(map) => Ok(LoadedSuite {
                name: fallback_name.to_string(),
                test_cases: parse_cases(map.into_iter())?,
            }),
            Value::Array(list) => Ok(LoadedSuite {
                name: fallback_name.to_string(),
                test_cases: parse_list(list)?,
            }),
            _ => Err(SuiteLoadError::UnrecognizedShape),
        }
    }
}

fn parse_cases(
    entries: impl Iterator<Item = (String, Value)>,
) -> Result<Vec<TestCase>, SuiteLoadError> {
    entries
        .map(|(id, value)| {
            serde_json::from_value(value)
                .map_err(|source| SuiteLoadError::InvalidTestCase { id, source })
        })
        .collect()
}

fn parse_list(list: Vec<Value>) -> Result<Vec<TestCase>, SuiteLoadError> {
    list.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let id = value
                .get("id")
                .and_then(Value::as_str)
                .map_or_else(|| format!("#{}", index), str::to_string);
            serde_json::from_value(value)
                .map_err(|source| SuiteLoadError::InvalidTestCase { id, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use harness_domain::{Environment, Expectation, ExpectedOutput};
    use serde_json::json;
    use std::io::Write;

    fn case_json(id: &str) -> Value {
        json!({
            "id": id,
            "test_env": "ci",
            "components": ["ars", "ara"],
            "test_case_objective": "AcceptanceTest",
            "test_case_input_id": "MONDO:0010794",
            "test_case_predicate_id": "biolink:treats",
            "input_category": "biolink:Disease",
            "qualifiers": null,
            "test_runner_settings": ["inferred"],
            "test_assets": [{
                "id": "Asset_1",
                "input_id": "MONDO:0010794",
                "predicate_id": "biolink:treats",
                "output_id": "DRUGBANK:DB00313",
                "expected_output": "NeverShow"
            }]
        })
    }

    #[test]
    fn test_load_suite_object() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let suite = json!({
            "id": "sprint_4_tests",
            "test_cases": {"TestCase_1": case_json("TestCase_1")}
        });
        write!(file, "{}", suite).unwrap();

        let loaded = SuiteLoader::load(file.path()).unwrap();

        assert_eq!(loaded.name, "sprint_4_tests");
        assert_eq!(loaded.test_cases.len(), 1);
        let case = &loaded.test_cases[0];
        assert_eq!(case.test_env, Environment::Ci);
        assert!(case.qualifiers.is_empty());
        assert_eq!(
            case.test_assets[0].expectation,
            Expectation::output("DRUGBANK:DB00313", ExpectedOutput::NeverShow)
        );
    }

    #[test]
    fn test_map_and_array_use_file_name() {
        let map = json!({"A": case_json("A"), "B": case_json("B")});
        let loaded = SuiteLoader::from_value(map, "local").unwrap();
        assert_eq!(loaded.name, "local");
        assert_eq!(loaded.test_cases.len(), 2);

        let list = json!([case_json("A")]);
        let loaded = SuiteLoader::from_value(list, "local").unwrap();
        assert_eq!(loaded.test_cases[0].id, "A");
    }

    #[test]
    fn test_bad_case_names_the_case() {
        let mut broken = case_json("Broken");
        broken["test_env"] = json!("staging");
        let err = SuiteLoader::from_value(json!([broken]), "s").unwrap_err();
        match err {
            SuiteLoadError::InvalidTestCase { id, .. } => assert_eq!(id, "Broken"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(matches!(
            SuiteLoader::from_value(json!(42), "s"),
            Err(SuiteLoadError::UnrecognizedShape)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SuiteLoader::load(Path::new("/nonexistent/suite.json")).unwrap_err();
        assert!(matches!(err, SuiteLoadError::Io { .. }));
    }
}
