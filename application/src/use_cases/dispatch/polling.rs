//! Deadline-bounded poll loop.
//!
//! A poll is a step function returning [`PollStep`]; the driver calls it,
//! sleeps the interval between calls, and gives up at the deadline. Expiry is
//! a value ([`PollOutcome::TimedOut`]), never an error.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// What one poll observed.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep<T> {
    /// Not terminal yet; poll again after the interval.
    Continue,
    /// Terminal; stop polling with this value.
    Done(T),
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Done(T),
    TimedOut,
}

/// Drive `step` every `interval` until it is done or `deadline` passes.
///
/// The first poll happens immediately. A step still in flight at the
/// deadline is abandoned.
pub async fn poll_until<T, F, Fut>(interval: Duration, deadline: Instant, mut step: F) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollStep<T>>,
{
    let run = async {
        loop {
            if let PollStep::Done(value) = step().await {
                return value;
            }
            tokio::time::sleep(interval).await;
        }
    };
    match tokio::time::timeout_at(deadline, run).await {
        Ok(value) => PollOutcome::Done(value),
        Err(_) => PollOutcome::TimedOut,
    }
}
