//! Registry source port
//!
//! Discovers the live network participants.

use async_trait::async_trait;
use harness_domain::Registry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to fetch registry: {0}")]
    Fetch(String),

    #[error("Invalid registry listing: {0}")]
    InvalidListing(String),
}

#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Participants whose declared TRAPI version matches `target_version`
    /// by major.minor.
    async fn fetch(&self, target_version: &str) -> Result<Registry, RegistryError>;
}
