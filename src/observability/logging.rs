//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Read the log filter from `RUST_LOG`, with a default when unset
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - The library never installs a subscriber; only `main` calls this

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "backoff_retry=info";

/// Build the env filter, falling back to `default` when `RUST_LOG` is unusable.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(default: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
