//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Retry loop produces:
//!     → events.rs (RetryEvent to the injected RetryObserver)
//!         → TracingObserver (default) → tracing events
//!
//! Binaries:
//!     → logging.rs (subscriber + RUST_LOG filter)
//! ```
//!
//! # Design Decisions
//! - Structured fields (attempt, wait_ms) rather than formatted strings
//! - Diagnostics are a side channel and never affect retry decisions

pub mod events;
pub mod logging;

pub use events::{NoopObserver, RetryEvent, RetryObserver, TracingObserver};
