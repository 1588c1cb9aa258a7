//! Two-phase protocol for the hub aggregator.
//!
//! 1. Submit the query and read the parent handle (`pk`).
//! 2. Fetch the parent with `trace=y` to discover one child handle per
//!    downstream agent, then poll every child concurrently, each on its own
//!    clock.
//! 3. Poll the parent until the hub reports `Done`/`Error` with a merged
//!    handle, and fetch the merged message once.

use super::polling::{PollOutcome, PollStep, poll_until};
use crate::config::DispatchParams;
use crate::ports::participant_gateway::{GatewayError, HttpReply, ParticipantGateway};
use harness_domain::{
    AgentResponse, DispatchRecord, MISSING_PK, PARENT_PK, Participant, agent_id,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Child status values that end polling.
const CHILD_TERMINAL: &[&str] = &["Done", "Error", "Unknown"];
const CHILD_RUNNING: &str = "Running";
/// Parent status values that mean the merge is available.
const MERGE_TERMINAL: &[&str] = &["Done", "Error"];

/// One child query discovered from the parent trace.
#[derive(Debug, Clone, PartialEq)]
struct Child {
    pk: String,
    agent: String,
}

/// How a child's poll loop ended before its budget ran out.
enum ChildPoll {
    Finished(Value),
    Failed(String),
}

/// How the merge poll ended before its budget ran out.
enum MergePoll {
    Merged(Option<String>),
    Failed(String),
}

/// Runs the hub protocol for one payload against one hub participant.
pub(super) struct HubSession<G: ParticipantGateway + 'static> {
    gateway: Arc<G>,
    base_url: String,
    submit_url: String,
    hub_agent: String,
    params: DispatchParams,
}

impl<G: ParticipantGateway + 'static> HubSession<G> {
    pub(super) fn new(gateway: Arc<G>, hub: &Participant, params: &DispatchParams) -> Self {
        Self {
            gateway,
            base_url: hub.url.clone(),
            submit_url: hub.query_url(&params.hub_infores),
            hub_agent: hub.agent_id().to_string(),
            params: params.clone(),
        }
    }

    fn message_url(base_url: &str, pk: &str) -> String {
        format!("{}/ars/api/messages/{}", base_url, pk)
    }

    fn trace_url(&self, pk: &str) -> String {
        format!("{}?trace=y", Self::message_url(&self.base_url, pk))
    }

    /// Run all three phases. Never fails; problems become sentinel responses.
    pub(super) async fn run(&self, payload: &Value) -> DispatchRecord {
        let mut record = DispatchRecord::new();

        let parent_pk = match self.submit(payload).await {
            Ok(pk) => pk,
            Err(response) => {
                record.insert_response(&self.hub_agent, response);
                return record;
            }
        };
        record.insert_pk(PARENT_PK, &parent_pk);

        let children = match self.discover_children(&parent_pk).await {
            Ok(children) => children,
            Err(e) => {
                error!("Failed to get hub children for {}: {}", parent_pk, e);
                record.insert_response(&self.hub_agent, AgentResponse::no_response());
                return record;
            }
        };
        for child in &children {
            record.insert_pk(&child.agent, &child.pk);
        }

        record.merge(self.poll_children(children).await);
        let merge_deadline = Instant::now() + self.params.merge_timeout;
        record.merge(self.poll_merged(&parent_pk, merge_deadline).await);
        record
    }

    /// POST the query; the hub answers with the parent handle.
    async fn submit(&self, payload: &Value) -> Result<String, AgentResponse> {
        let reply = self
            .gateway
            .post_json(&self.submit_url, payload)
            .await
            .map_err(|e| {
                error!("Hub submit to {} failed: {}", self.submit_url, e);
                AgentResponse::no_response()
            })?;
        if !reply.is_success() {
            error!(
                "Hub submit to {} returned status {}",
                self.submit_url, reply.status_code
            );
            return Err(AgentResponse::new(reply.status_code, reply.body));
        }
        match reply.body.get("pk").and_then(Value::as_str) {
            Some(pk) if !pk.is_empty() => Ok(pk.to_string()),
            _ => {
                error!("Hub submit to {} returned no pk", self.submit_url);
                Err(AgentResponse::no_response())
            }
        }
    }

    async fn discover_children(&self, parent_pk: &str) -> Result<Vec<Child>, GatewayError> {
        let reply = successful(self.gateway.get_json(&self.trace_url(parent_pk)).await)?;
        let children = reply
            .body
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().filter_map(parse_child).collect())
            .unwrap_or_default();
        Ok(children)
    }

    /// Poll every child concurrently; each child gets its own budget.
    async fn poll_children(&self, children: Vec<Child>) -> DispatchRecord {
        let mut record = DispatchRecord::new();
        let mut join_set = JoinSet::new();
        let mut agents = HashMap::new();

        for child in children {
            let gateway = Arc::clone(&self.gateway);
            let url = Self::message_url(&self.base_url, &child.pk);
            let interval = self.params.poll_interval;
            let deadline = Instant::now() + self.params.child_timeout;
            let agent = child.agent.clone();
            let handle = join_set.spawn(async move {
                let response = poll_child(gateway.as_ref(), &url, &agent, interval, deadline).await;
                (agent, response)
            });
            agents.insert(handle.id(), child.agent);
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (agent, response))) => record.insert_response(agent, response),
                Err(e) => {
                    let agent = agents.get(&e.id()).cloned().unwrap_or_default();
                    error!("Polling child {} failed: {}", agent, e);
                    record.insert_response(agent, AgentResponse::no_response());
                }
            }
        }
        record
    }

    /// Wait for the hub's merged message and fetch it.
    async fn poll_merged(&self, parent_pk: &str, deadline: Instant) -> DispatchRecord {
        let mut record = DispatchRecord::new();
        let gateway = self.gateway.as_ref();
        let trace_url = self.trace_url(parent_pk);
        let trace_url = trace_url.as_str();

        let outcome = poll_until(self.params.poll_interval, deadline, move || async move {
            let reply = match successful(gateway.get_json(trace_url).await) {
                Ok(reply) => reply,
                Err(e) => return PollStep::Done(MergePoll::Failed(e.to_string())),
            };
            let status = reply.body.get("status").and_then(Value::as_str);
            if status.is_some_and(|s| MERGE_TERMINAL.contains(&s)) {
                let merged = reply
                    .body
                    .get("merged_version")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                PollStep::Done(MergePoll::Merged(merged))
            } else {
                info!("Hub merging not done, waiting...");
                PollStep::Continue
            }
        })
        .await;

        match outcome {
            PollOutcome::Done(MergePoll::Merged(Some(merged_pk))) => {
                let response = self.fetch_merged(&merged_pk).await;
                record.insert_pk(&self.hub_agent, merged_pk);
                record.insert_response(&self.hub_agent, response);
            }
            PollOutcome::Done(MergePoll::Merged(None)) => {
                error!("Failed to get the hub merged message from pk: {}", parent_pk);
                record.insert_pk(&self.hub_agent, MISSING_PK);
                record.insert_response(&self.hub_agent, AgentResponse::timed_out());
            }
            PollOutcome::Done(MergePoll::Failed(e)) => {
                error!("Polling hub merge for {} failed: {}", parent_pk, e);
                record.insert_pk(&self.hub_agent, MISSING_PK);
                record.insert_response(&self.hub_agent, AgentResponse::no_response());
            }
            PollOutcome::TimedOut => {
                warn!(
                    "Hub merging took longer than {}s",
                    self.params.merge_timeout.as_secs()
                );
                record.insert_pk(&self.hub_agent, MISSING_PK);
                record.insert_response(&self.hub_agent, AgentResponse::timed_out());
            }
        }
        record
    }

    async fn fetch_merged(&self, merged_pk: &str) -> AgentResponse {
        let url = Self::message_url(&self.base_url, merged_pk);
        match successful(self.gateway.get_json(&url).await) {
            Ok(reply) => {
                let response = AgentResponse::from_hub_message(&reply.body);
                info!(
                    "Got hub merged message with status code {}",
                    response.status_code
                );
                response
            }
            Err(e) => {
                error!("Fetching hub merged message {} failed: {}", merged_pk, e);
                AgentResponse::no_response()
            }
        }
    }
}

/// Poll one child until it leaves `Running` or its budget expires.
async fn poll_child<G: ParticipantGateway + ?Sized>(
    gateway: &G,
    url: &str,
    agent: &str,
    interval: std::time::Duration,
    deadline: Instant,
) -> AgentResponse {
    info!("Getting response for {}...", agent);
    let outcome = poll_until(interval, deadline, move || async move {
        let reply = match successful(gateway.get_json(url).await) {
            Ok(reply) => reply,
            Err(e) => return PollStep::Done(ChildPoll::Failed(e.to_string())),
        };
        let status = reply.body.pointer("/fields/status").and_then(Value::as_str);
        match status {
            Some(CHILD_RUNNING) => {
                info!("{} is still Running...", agent);
                PollStep::Continue
            }
            Some(s) if CHILD_TERMINAL.contains(&s) => PollStep::Done(ChildPoll::Finished(reply.body)),
            other => {
                info!("Got unhandled status from {}: {:?}", agent, other);
                PollStep::Done(ChildPoll::Finished(reply.body))
            }
        }
    })
    .await;

    match outcome {
        PollOutcome::Done(ChildPoll::Finished(message)) => {
            let response = AgentResponse::from_hub_message(&message);
            info!(
                "Got response for {} with status code {}.",
                agent, response.status_code
            );
            response
        }
        PollOutcome::Done(ChildPoll::Failed(e)) => {
            error!("Getting hub child response ({}) failed with: {}", agent, e);
            AgentResponse::no_response()
        }
        PollOutcome::TimedOut => {
            warn!("Timed out getting hub child message for {}", agent);
            AgentResponse::timed_out()
        }
    }
}

/// Treat a non-2xx reply as a failed request.
fn successful(reply: Result<HttpReply, GatewayError>) -> Result<HttpReply, GatewayError> {
    let reply = reply?;
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(GatewayError::RequestFailed(format!(
            "status code {}",
            reply.status_code
        )))
    }
}

fn parse_child(child: &Value) -> Option<Child> {
    let pk = child.get("message").and_then(Value::as_str);
    let infores = child.pointer("/actor/inforesid").and_then(Value::as_str);
    match (pk, infores) {
        (Some(pk), Some(infores)) => Some(Child {
            pk: pk.to_string(),
            agent: agent_id(infores).to_string(),
        }),
        _ => {
            warn!("Skipping malformed hub child: {}", child);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_child() {
        let child = json!({"message": "abc", "actor": {"inforesid": "infores:aragorn"}});
        assert_eq!(
            parse_child(&child),
            Some(Child {
                pk: "abc".to_string(),
                agent: "aragorn".to_string(),
            })
        );
        assert_eq!(parse_child(&json!({"message": "abc"})), None);
    }

    #[test]
    fn test_successful_rejects_error_status() {
        assert!(successful(Ok(HttpReply::ok(json!({})))).is_ok());
        assert!(successful(Ok(HttpReply::new(503, Value::Null))).is_err());
    }
}
