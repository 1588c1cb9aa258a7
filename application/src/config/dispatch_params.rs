//! Dispatch parameters: fan-out and polling control.
//!
//! [`DispatchParams`] groups the static parameters that control the
//! dispatch engine in [`DispatchEngine`](crate::use_cases::dispatch::DispatchEngine).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Infores of the default hub aggregator.
pub const DEFAULT_HUB_INFORES: &str = "infores:ars";

/// Fan-out and polling control parameters.
///
/// The child and merge budgets are independent clocks: each child's budget
/// starts when that child's poll loop starts, the merge budget when child
/// polling starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Concurrent requests admitted per role.
    pub concurrency: usize,
    /// Sleep between two polls of the same handle.
    pub poll_interval: Duration,
    /// Wall-clock budget for each child query.
    pub child_timeout: Duration,
    /// Wall-clock budget for the hub's merged result.
    pub merge_timeout: Duration,
    /// Infores of the participant that gets the two-phase hub protocol.
    pub hub_infores: String,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            concurrency: 1,
            poll_interval: Duration::from_secs(10),
            child_timeout: Duration::from_secs(360),
            merge_timeout: Duration::from_secs(600),
            hub_infores: DEFAULT_HUB_INFORES.to_string(),
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_child_timeout(mut self, timeout: Duration) -> Self {
        self.child_timeout = timeout;
        self
    }

    pub fn with_merge_timeout(mut self, timeout: Duration) -> Self {
        self.merge_timeout = timeout;
        self
    }

    pub fn with_hub_infores(mut self, infores: impl Into<String>) -> Self {
        self.hub_infores = infores.into();
        self
    }

    /// Agent id the hub's merged result is recorded under.
    pub fn hub_agent(&self) -> &str {
        harness_domain::agent_id(&self.hub_infores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DispatchParams::default();
        assert_eq!(params.concurrency, 1);
        assert_eq!(params.poll_interval, Duration::from_secs(10));
        assert_eq!(params.child_timeout, Duration::from_secs(360));
        assert_eq!(params.merge_timeout, Duration::from_secs(600));
        assert_eq!(params.hub_agent(), "ars");
    }

    #[test]
    fn test_builder() {
        let params = DispatchParams::default()
            .with_concurrency(0)
            .with_child_timeout(Duration::from_secs(60))
            .with_hub_infores("infores:hub");

        assert_eq!(params.concurrency, 1);
        assert_eq!(params.child_timeout, Duration::from_secs(60));
        assert_eq!(params.hub_agent(), "hub");
    }
}
