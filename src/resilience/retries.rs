//! Retry logic.
//!
//! # Responsibilities
//! - Validate options once, when an operation is wrapped
//! - Run the operation, retrying every failure with exponential backoff
//! - Surface the final failure with the configuration that produced it
//!
//! # Design Decisions
//! - Every failure is retryable; the only limit is the retry count
//! - Each invocation owns its attempt counter, so concurrent calls never interact
//! - Earlier failures are dropped, only the last one is kept as the source
//! - No timeout or cancellation; dropping the future stops the sequence

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::{RetryConfig, RetryOptions, ValidationError};
use crate::observability::events::{RetryEvent, RetryObserver, TracingObserver};
use crate::resilience::state::{AttemptState, Attempts};

/// Returned when every attempt failed.
#[derive(Debug, Error)]
#[error("Maximum retries ({}) exceeded", .config.retries)]
pub struct RetryError<E> {
    config: RetryConfig,
    #[source]
    last_error: E,
}

impl<E> RetryError<E> {
    pub(crate) fn new(config: RetryConfig, last_error: E) -> Self {
        Self { config, last_error }
    }

    /// The resolved configuration the sequence ran with.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Configured retry count.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Failure from the final attempt.
    pub fn last_error(&self) -> &E {
        &self.last_error
    }

    pub fn into_last_error(self) -> E {
        self.last_error
    }
}

/// An operation wrapped with retry semantics.
///
/// Built by [`retry`]. The configuration is shared read-only by every call.
#[derive(Clone)]
pub struct Retry<F> {
    operation: F,
    config: Arc<RetryConfig>,
    observer: Arc<dyn RetryObserver>,
}

/// Wrap `operation` with retries.
///
/// `operation` receives the input and the zero-based attempt index. Options
/// are validated here, so an invalid policy fails before anything runs.
pub fn retry<F, I, T, E, Fut>(
    operation: F,
    options: RetryOptions,
) -> Result<Retry<F>, ValidationError>
where
    F: Fn(I, u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let config = options.resolve()?;

    Ok(Retry {
        operation,
        config: Arc::new(config),
        observer: Arc::new(TracingObserver),
    })
}

impl<F> Retry<F> {
    /// Replace the diagnostic observer.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: RetryObserver + 'static,
    {
        self.observer = Arc::new(observer);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run the operation with `input`, retrying failures.
    ///
    /// Every attempt gets a clone of the same input.
    pub async fn call<I, T, E, Fut>(&self, input: I) -> Result<T, RetryError<E>>
    where
        F: Fn(I, u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        I: Clone,
    {
        let mut attempts = Attempts::new(&self.config);
        attempts.start();

        loop {
            let attempt = attempts.state().attempt();
            let started = Instant::now();

            let delay = {
                let error = match (self.operation)(input.clone(), attempt).await {
                    Ok(value) => {
                        attempts.succeeded();
                        return Ok(value);
                    }
                    Err(error) => error,
                };

                let next = attempts.failed(&mut rand::thread_rng());
                match next {
                    Some(AttemptState::Waiting {
                        attempt: next_attempt,
                        delay,
                    }) => {
                        self.observer.observe(&RetryEvent::AttemptFailed {
                            attempt,
                            elapsed: started.elapsed(),
                        });
                        self.observer.observe(&RetryEvent::Backoff {
                            attempt: next_attempt,
                            wait: delay,
                            jitter: self.config.jitter,
                        });
                        delay
                    }
                    Some(AttemptState::Exhausted { .. }) => {
                        self.observer.observe(&RetryEvent::Exhausted {
                            retries: self.config.retries,
                        });
                        return Err(RetryError::new(*self.config, error));
                    }
                    // The loop only calls `failed` while an attempt is running.
                    other => {
                        unreachable!("no transition after attempt {attempt} failed: {other:?}")
                    }
                }
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempts.resume();
        }
    }

    /// Run the operation without an input value.
    pub async fn run<T, E, Fut>(&self) -> Result<T, RetryError<E>>
    where
        F: Fn((), u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.call(()).await
    }

    /// Run one independent retry sequence per input, concurrently.
    ///
    /// Results are returned in input order.
    pub async fn call_all<I, T, E, Fut>(
        &self,
        inputs: impl IntoIterator<Item = I>,
    ) -> Vec<Result<T, RetryError<E>>>
    where
        F: Fn(I, u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        I: Clone,
    {
        join_all(inputs.into_iter().map(|input| self.call(input))).await
    }
}

impl<F> fmt::Debug for Retry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
