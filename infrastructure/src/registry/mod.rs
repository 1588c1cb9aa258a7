//! SmartAPI registry client
//!
//! Downloads the SmartAPI listing and keeps the TRAPI registrations whose
//! version line matches the requested one. Incomplete entries are logged and
//! skipped; only a failed download is fatal.

use async_trait::async_trait;
use harness_application::{RegistryError, RegistrySource};
use harness_domain::{Component, Participant, Registry, version_matches};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_REGISTRY_URL: &str = "https://smart-api.info/api/query?limit=1000&q=TRAPI";

pub struct SmartApiRegistry {
    client: reqwest::Client,
    url: String,
}

impl SmartApiRegistry {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Fetch(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RegistrySource for SmartApiRegistry {
    async fn fetch(&self, target_version: &str) -> Result<Registry, RegistryError> {
        info!("Fetching registry from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RegistryError::Fetch(e.to_string()))?;
        let listing: Value = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidListing(e.to_string()))?;
        parse_registry(&listing, target_version)
    }
}

/// Build a registry from a SmartAPI listing (`{"hits": [...]}`).
pub fn parse_registry(listing: &Value, target_version: &str) -> Result<Registry, RegistryError> {
    let hits = listing
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| RegistryError::InvalidListing("missing hits array".to_string()))?;

    let mut registry = Registry::new();
    for hit in hits {
        add_hit(&mut registry, hit, target_version);
    }
    Ok(registry)
}

fn add_hit(registry: &mut Registry, hit: &Value, target_version: &str) {
    let Some(title) = hit.pointer("/info/title").and_then(Value::as_str) else {
        warn!("No title for service. Cannot use.");
        return;
    };
    let id = hit.get("_id").and_then(Value::as_str).unwrap_or(title);
    let infores = match hit.pointer("/info/x-translator/infores").and_then(Value::as_str) {
        Some(infores) => infores.to_string(),
        None => {
            warn!("No x-translator.infores for {} ({})", title, id);
            format!("infores:{}", id)
        }
    };
    let Some(component) = hit
        .pointer("/info/x-translator/component")
        .and_then(Value::as_str)
    else {
        warn!("No x-translator.component for {} ({})", title, id);
        return;
    };
    let component: Component = match component.parse() {
        Ok(component) => component,
        Err(e) => {
            warn!("Skipping {}: {}", title, e);
            return;
        }
    };
    let Some(version) = hit.pointer("/info/x-trapi/version").and_then(Value::as_str) else {
        warn!("No x-trapi.version for {} ({})", title, id);
        return;
    };
    if !version_matches(version, target_version) {
        info!("TRAPI version {} != {} for {} ({})", version, target_version, title, id);
        return;
    }
    let Some(servers) = hit.get("servers").and_then(Value::as_array) else {
        warn!("No servers for {} ({})", title, id);
        return;
    };

    for server in servers {
        let Some(maturity) = server.get("x-maturity").and_then(Value::as_str) else {
            warn!("{} has no maturity", infores);
            continue;
        };
        let Some(url) = server.get("url").and_then(Value::as_str) else {
            warn!("No servers[].url for {} ({})", title, id);
            continue;
        };
        registry.insert(
            maturity,
            Participant::new(infores.as_str(), url, component).with_title(id, title),
        );
    }
}
