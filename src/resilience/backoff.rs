//! Exponential backoff with full jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Un-jittered, uncapped wait before `attempt`, in milliseconds.
///
/// `2^(attempt-1) * wait_ratio`, and zero for the first attempt.
pub fn exponential_base_ms(wait_ratio: f64, attempt: u32) -> f64 {
    if attempt == 0 {
        return 0.0;
    }

    // attempt is bounded by the retry limit (64), well inside i32.
    let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
    2f64.powi(exponent) * wait_ratio
}

/// Wait before `attempt` in milliseconds, after jitter and the cap.
///
/// The jitter range always comes from the uncapped base; the cap is applied
/// to the jittered value.
pub fn wait_ms<R: Rng>(config: &RetryConfig, attempt: u32, rng: &mut R) -> f64 {
    if attempt == 0 {
        return 0.0;
    }

    let base = exponential_base_ms(config.wait_ratio, attempt);
    let wait = if config.jitter {
        (rng.gen::<f64>() * base).ceil()
    } else {
        base
    };

    wait.min(config.maximum_backoff)
}

/// Calculate the backoff delay before `attempt`.
pub fn calculate_backoff<R: Rng>(config: &RetryConfig, attempt: u32, rng: &mut R) -> Duration {
    millis_to_duration(wait_ms(config, attempt, rng))
}

/// Convert a millisecond count to a `Duration`, saturating on overflow.
pub(crate) fn millis_to_duration(ms: f64) -> Duration {
    let nanos = (ms * 1_000_000.0).round();
    if nanos < u64::MAX as f64 {
        return Duration::from_nanos(nanos as u64);
    }

    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}
