//! Value objects for the test model: environments, components, buckets.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment a test case targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Ci,
    Test,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Ci => "ci",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }

    /// Registry maturity tag (`servers[].x-maturity`) that serves this environment.
    pub fn maturity(&self) -> &'static str {
        match self {
            Environment::Dev => "development",
            Environment::Ci => "staging",
            Environment::Test => "testing",
            Environment::Prod => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "ci" => Ok(Environment::Ci),
            "test" => Ok(Environment::Test),
            "prod" => Ok(Environment::Prod),
            _ => Err(DomainError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Role a participant plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// The hub aggregator
    Ars,
    /// Autonomous reasoning agents
    Ara,
    /// Knowledge providers
    Kp,
    #[serde(alias = "utilities")]
    Utility,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Ars => "ars",
            Component::Ara => "ara",
            Component::Kp => "kp",
            Component::Utility => "utility",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ars" => Ok(Component::Ars),
            "ara" => Ok(Component::Ara),
            "kp" => Ok(Component::Kp),
            "utility" | "utilities" => Ok(Component::Utility),
            _ => Err(DomainError::UnknownComponent(s.to_string())),
        }
    }
}

/// Expected-output bucket: the quality ladder an asset's output is judged against.
///
/// Variants are declared best-first, so the derived `Ord` sorts
/// `TopAnswer` before `NeverShow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpectedOutput {
    TopAnswer,
    Acceptable,
    BadButForgivable,
    NeverShow,
}

impl ExpectedOutput {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedOutput::TopAnswer => "TopAnswer",
            ExpectedOutput::Acceptable => "Acceptable",
            ExpectedOutput::BadButForgivable => "BadButForgivable",
            ExpectedOutput::NeverShow => "NeverShow",
        }
    }

    pub fn all() -> [ExpectedOutput; 4] {
        [
            ExpectedOutput::TopAnswer,
            ExpectedOutput::Acceptable,
            ExpectedOutput::BadButForgivable,
            ExpectedOutput::NeverShow,
        ]
    }
}

impl fmt::Display for ExpectedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpectedOutput {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpectedOutput::all()
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownExpectedOutput(s.to_string()))
    }
}

/// What a test case is trying to establish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestObjective {
    AcceptanceTest,
    PathfinderTest,
    QuantitativeTest,
    Other(String),
}

impl TestObjective {
    pub fn parse(s: &str) -> Self {
        match s {
            "AcceptanceTest" => TestObjective::AcceptanceTest,
            "PathfinderTest" => TestObjective::PathfinderTest,
            "QuantitativeTest" => TestObjective::QuantitativeTest,
            other => TestObjective::Other(other.to_string()),
        }
    }
}
