//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use backoff_retry::RetryEvent;
use thiserror::Error;

/// Failure produced by a [`Flaky`] operation.
#[derive(Debug, Error, PartialEq)]
#[error("Error {call}/{failures}")]
pub struct WorkError {
    pub call: u32,
    pub failures: u32,
}

/// An operation that fails a fixed number of times, then succeeds.
pub struct Flaky {
    failures: u32,
    calls: AtomicU32,
    seen: Mutex<Vec<u32>>,
}

impl Flaky {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn always_failing() -> Self {
        Self::new(u32::MAX)
    }

    /// Echo `item` once the configured failures are used up.
    ///
    /// Checks that the attempt index matches the number of earlier calls.
    pub async fn attempt<T>(&self, item: T, attempt: u32) -> Result<T, WorkError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(call, attempt, "attempt index out of step with calls");
        self.seen.lock().unwrap().push(attempt);

        tokio::task::yield_now().await;

        if call < self.failures {
            Err(WorkError {
                call: call + 1,
                failures: self.failures,
            })
        } else {
            Ok(item)
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn attempts(&self) -> Vec<u32> {
        self.seen.lock().unwrap().clone()
    }
}

/// Collects every event an observer receives.
#[derive(Default)]
#[allow(dead_code)]
pub struct Recorder {
    events: Mutex<Vec<RetryEvent>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn record(&self, event: &RetryEvent) {
        self.events.lock().unwrap().push(*event);
    }

    pub fn events(&self) -> Vec<RetryEvent> {
        self.events.lock().unwrap().clone()
    }
}
