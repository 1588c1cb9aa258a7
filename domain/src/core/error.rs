//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown test environment: {0}")]
    UnknownEnvironment(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Unknown expected output: {0}")]
    UnknownExpectedOutput(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_environment_display() {
        let error = DomainError::UnknownEnvironment("staging".to_string());
        assert_eq!(error.to_string(), "Unknown test environment: staging");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::UnknownComponent("x".to_string()).is_cancelled());
    }
}
