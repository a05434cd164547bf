//! Configuration validation.
//!
//! # Responsibilities
//! - Validate value ranges for every retry option
//! - Fill in defaults for unset fields
//!
//! # Design Decisions
//! - Runs once at wrap time, never per invocation
//! - Stops at the first out-of-range field
//! - NaN is out of range for every numeric field

use thiserror::Error;

use crate::config::schema::{
    RetryConfig, RetryOptions, DEFAULT_JITTER, DEFAULT_RETRIES, DEFAULT_WAIT_RATIO,
};

pub const MINIMUM_WAIT_RATIO: f64 = 0.0;
pub const MAXIMUM_WAIT_RATIO: f64 = 60_000.0;

pub const MINIMUM_RETRIES: i64 = 0;
pub const MAXIMUM_RETRIES: i64 = 64;

pub const MINIMUM_BACKOFF: f64 = 0.0;

/// A retry option outside its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("wait_ratio must be >= {} and <= {}", MINIMUM_WAIT_RATIO, MAXIMUM_WAIT_RATIO)]
    WaitRatio(f64),

    #[error("retries must be >= {} and <= {}", MINIMUM_RETRIES, MAXIMUM_RETRIES)]
    Retries(i64),

    #[error("maximum_backoff must be >= {}", MINIMUM_BACKOFF)]
    MaximumBackoff(f64),
}

/// Validate `options` and resolve them into a `RetryConfig`.
pub fn validate_options(options: &RetryOptions) -> Result<RetryConfig, ValidationError> {
    let wait_ratio = options.wait_ratio.unwrap_or(DEFAULT_WAIT_RATIO);
    if !(MINIMUM_WAIT_RATIO..=MAXIMUM_WAIT_RATIO).contains(&wait_ratio) {
        return Err(ValidationError::WaitRatio(wait_ratio));
    }

    let retries = options.retries.unwrap_or(i64::from(DEFAULT_RETRIES));
    if !(MINIMUM_RETRIES..=MAXIMUM_RETRIES).contains(&retries) {
        return Err(ValidationError::Retries(retries));
    }

    let maximum_backoff = options.maximum_backoff.unwrap_or(f64::INFINITY);
    if maximum_backoff.is_nan() || maximum_backoff < MINIMUM_BACKOFF {
        return Err(ValidationError::MaximumBackoff(maximum_backoff));
    }

    Ok(RetryConfig {
        wait_ratio,
        // In range above, so the narrowing cannot truncate.
        retries: retries as u32,
        jitter: options.jitter.unwrap_or(DEFAULT_JITTER),
        maximum_backoff,
    })
}
