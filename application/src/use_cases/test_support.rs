//! Scripted participant gateway shared by the use case tests.

use crate::ports::participant_gateway::{GatewayError, HttpReply, ParticipantGateway};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Script = HashMap<String, VecDeque<Result<HttpReply, GatewayError>>>;

/// Replies are scripted per URL. The last scripted reply for a URL repeats.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    posts: Mutex<Script>,
    gets: Mutex<Script>,
    calls: Mutex<HashMap<String, usize>>,
    post_delay: Duration,
    panic_url: Option<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_post(self, url: &str, reply: Result<HttpReply, GatewayError>) -> Self {
        push(&self.posts, url, reply);
        self
    }

    pub(crate) fn on_get(self, url: &str, reply: Result<HttpReply, GatewayError>) -> Self {
        push(&self.gets, url, reply);
        self
    }

    pub(crate) fn with_post_delay(mut self, delay: Duration) -> Self {
        self.post_delay = delay;
        self
    }

    /// Panic inside the task that posts to `url`.
    pub(crate) fn panicking_on(mut self, url: &str) -> Self {
        self.panic_url = Some(url.to_string());
        self
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next(&self, script: &Mutex<Script>, url: &str) -> Result<HttpReply, GatewayError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
        let mut script = script.lock().unwrap();
        let queue = script
            .get_mut(url)
            .ok_or_else(|| GatewayError::ConnectionError(format!("unscripted url {}", url)))?;
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

fn push(script: &Mutex<Script>, url: &str, reply: Result<HttpReply, GatewayError>) {
    script
        .lock()
        .unwrap()
        .entry(url.to_string())
        .or_default()
        .push_back(reply);
}

#[async_trait]
impl ParticipantGateway for ScriptedGateway {
    async fn post_json(&self, url: &str, _body: &Value) -> Result<HttpReply, GatewayError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.post_delay.is_zero() {
            tokio::time::sleep(self.post_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.panic_url.as_deref() == Some(url) {
            panic!("boom");
        }
        self.next(&self.posts, url)
    }

    async fn get_json(&self, url: &str) -> Result<HttpReply, GatewayError> {
        self.next(&self.gets, url)
    }
}
