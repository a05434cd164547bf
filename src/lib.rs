//! Retry asynchronous operations with exponential backoff and full jitter.

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::{RetryConfig, RetryOptions, ValidationError};
pub use observability::{NoopObserver, RetryEvent, RetryObserver, TracingObserver};
pub use resilience::{retry, Retry, RetryError};
