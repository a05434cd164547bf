//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Retry::call(input):
//!     → state.rs (Attempts: Initial → Attempting → Waiting/Succeeded/Exhausted)
//!     → On failure: backoff.rs (exponential wait, full jitter, cap)
//!     → tokio::time::sleep, then the next attempt
//!     → On exhaustion: RetryError { config, last_error }
//! ```
//!
//! # Design Decisions
//! - Options are validated when wrapping, never per call
//! - State machine is pure; timing lives only in the async driver
//! - No retry classification, circuit breaking or retry budgets

pub mod backoff;
pub mod retries;
pub mod state;

pub use retries::{retry, Retry, RetryError};
pub use state::{AttemptState, Attempts};
