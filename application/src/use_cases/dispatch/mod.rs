//! Dispatch & polling engine
//!
//! Sends every distinct payload to every registered participant, one role
//! at a time. Within a role, one task per (participant, payload) runs
//! concurrently behind a counting admission gate sized by
//! [`DispatchParams::concurrency`]. The hub participant runs the two-phase
//! protocol in [`hub`].
//!
//! Each task owns the record it builds; records are merged into the
//! payload's outcome only after the task finishes. Dropping the dispatch
//! future aborts every task it spawned, child polls included.

mod hub;
pub mod polling;

use crate::config::DispatchParams;
use crate::ports::participant_gateway::ParticipantGateway;
use harness_domain::{
    AgentResponse, Component, DispatchRecord, Environment, Participant, PayloadHash,
    PayloadOutcome, QueryPayload, Registry,
};
use hub::HubSession;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

pub use polling::{PollOutcome, PollStep, poll_until};

/// Fans payloads out to participants and collects their raw responses.
pub struct DispatchEngine<G: ParticipantGateway + 'static> {
    gateway: Arc<G>,
    params: DispatchParams,
}

impl<G: ParticipantGateway + 'static> DispatchEngine<G> {
    pub fn new(gateway: Arc<G>, params: DispatchParams) -> Self {
        Self { gateway, params }
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    /// Dispatch every payload to the participants of each requested role.
    ///
    /// Every payload gets an outcome. A payload nobody answered has an empty
    /// record. A participant task that crashes only records a sentinel
    /// response for that participant.
    pub async fn dispatch(
        &self,
        payloads: &BTreeMap<PayloadHash, QueryPayload>,
        registry: &Registry,
        env: Environment,
        components: &[Component],
    ) -> BTreeMap<PayloadHash, PayloadOutcome> {
        let mut outcomes: BTreeMap<PayloadHash, PayloadOutcome> = payloads
            .keys()
            .map(|hash| (hash.clone(), PayloadOutcome::Dispatched(DispatchRecord::new())))
            .collect();
        let bodies: Vec<(PayloadHash, Arc<Value>)> = payloads
            .iter()
            .map(|(hash, payload)| (hash.clone(), Arc::new(payload.to_json())))
            .collect();

        for &component in components {
            let participants = registry.participants(env, component);
            if participants.is_empty() {
                warn!("No {} participants registered for {}", component, env);
                continue;
            }
            info!(
                "Sending {} queries to {} {} participants",
                bodies.len(),
                participants.len(),
                component
            );
            self.dispatch_role(participants, &bodies, &mut outcomes).await;
        }

        outcomes
    }

    async fn dispatch_role(
        &self,
        participants: &[Participant],
        bodies: &[(PayloadHash, Arc<Value>)],
        outcomes: &mut BTreeMap<PayloadHash, PayloadOutcome>,
    ) {
        let semaphore = Arc::new(Semaphore::new(self.params.concurrency.max(1)));
        let mut join_set = JoinSet::new();
        let mut tasks = HashMap::new();

        for participant in participants {
            for (hash, body) in bodies {
                let handle = join_set.spawn(Self::dispatch_one(
                    Arc::clone(&self.gateway),
                    Arc::clone(&semaphore),
                    participant.clone(),
                    Arc::clone(body),
                    self.params.clone(),
                ));
                tasks.insert(
                    handle.id(),
                    (hash.clone(), participant.agent_id().to_string()),
                );
            }
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            let (id, record) = match joined {
                Ok((id, record)) => (id, record),
                Err(e) => {
                    let mut record = DispatchRecord::new();
                    if let Some((hash, agent)) = tasks.get(&e.id()) {
                        error!("Dispatch of payload {} to {} failed: {}", hash.short(), agent, e);
                        record.insert_response(agent, AgentResponse::no_response());
                    }
                    (e.id(), record)
                }
            };
            if let Some((hash, _)) = tasks.get(&id)
                && let Some(PayloadOutcome::Dispatched(existing)) = outcomes.get_mut(hash)
            {
                existing.merge(record);
            }
        }
    }

    /// One payload against one participant. Never fails.
    async fn dispatch_one(
        gateway: Arc<G>,
        semaphore: Arc<Semaphore>,
        participant: Participant,
        payload: Arc<Value>,
        params: DispatchParams,
    ) -> DispatchRecord {
        let mut record = DispatchRecord::new();
        let Ok(_permit) = semaphore.acquire_owned().await else {
            record.insert_response(participant.agent_id(), AgentResponse::no_response());
            return record;
        };

        if participant.is_hub(&params.hub_infores) {
            return HubSession::new(gateway, &participant, &params)
                .run(&payload)
                .await;
        }

        let url = participant.query_url(&params.hub_infores);
        let response = match gateway.post_json(&url, &payload).await {
            Ok(reply) => {
                info!(
                    "{} responded with status code {}",
                    participant.agent_id(),
                    reply.status_code
                );
                AgentResponse::new(reply.status_code, reply.body)
            }
            Err(e) => {
                error!("Query to {} failed: {}", participant.agent_id(), e);
                AgentResponse::no_response()
            }
        };
        record.insert_response(participant.agent_id(), response);
        record
    }
}
