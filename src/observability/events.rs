//! Retry diagnostics.
//!
//! # Responsibilities
//! - Describe what a retry sequence is doing as `RetryEvent`s
//! - Deliver events to an observer injected by the caller
//!
//! # Design Decisions
//! - Observers are passed to each `Retry`, never looked up globally
//! - The default observer forwards to `tracing`; subscribers decide visibility
//! - Observers are side channels and cannot change retry behaviour

use std::time::Duration;

/// A diagnostic event emitted during a retry sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryEvent {
    /// About to wait `wait` before running `attempt`.
    Backoff {
        attempt: u32,
        wait: Duration,
        jitter: bool,
    },
    /// `attempt` failed after running for `elapsed` and will be retried.
    AttemptFailed { attempt: u32, elapsed: Duration },
    /// The final attempt failed; `retries` retries were used up.
    Exhausted { retries: u32 },
}

/// Receives retry diagnostics.
pub trait RetryObserver: Send + Sync {
    fn observe(&self, event: &RetryEvent);
}

impl<F> RetryObserver for F
where
    F: Fn(&RetryEvent) + Send + Sync,
{
    fn observe(&self, event: &RetryEvent) {
        self(event)
    }
}

/// Emits every event as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn observe(&self, event: &RetryEvent) {
        match *event {
            RetryEvent::Backoff { attempt, wait, jitter } => {
                tracing::debug!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    jitter,
                    "Waiting before retry"
                );
            }
            RetryEvent::AttemptFailed { attempt, elapsed } => {
                tracing::debug!(
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Attempt failed"
                );
            }
            RetryEvent::Exhausted { retries } => {
                tracing::debug!(retries, "Retries exceeded");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {
    fn observe(&self, _event: &RetryEvent) {}
}
