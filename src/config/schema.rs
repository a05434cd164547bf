//! Configuration schema definitions.
//!
//! `RetryOptions` is what callers and config files supply: every field is
//! optional. `RetryConfig` is the resolved, validated record shared by every
//! invocation of a wrapped operation.

use serde::Deserialize;

use crate::config::validation::{validate_options, ValidationError};

/// Default base multiplier for backoff, in milliseconds.
pub const DEFAULT_WAIT_RATIO: f64 = 100.0;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 8;

/// Default jitter setting.
pub const DEFAULT_JITTER: bool = true;

/// Partial retry options. Unset fields take the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryOptions {
    /// Base multiplier for backoff in milliseconds (0..=60000).
    pub wait_ratio: Option<f64>,

    /// Maximum number of retries after the first attempt (0..=64).
    /// Signed so that negative values reach validation instead of failing to parse.
    pub retries: Option<i64>,

    /// Randomize each wait uniformly between zero and the exponential value.
    pub jitter: Option<bool>,

    /// Upper bound on any single wait, in milliseconds.
    pub maximum_backoff: Option<f64>,
}

impl RetryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_ratio(mut self, wait_ratio: f64) -> Self {
        self.wait_ratio = Some(wait_ratio);
        self
    }

    pub fn retries(mut self, retries: i64) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn maximum_backoff(mut self, maximum_backoff: f64) -> Self {
        self.maximum_backoff = Some(maximum_backoff);
        self
    }

    /// Layer `overrides` on top of `self`. Fields set in `overrides` win.
    pub fn merge(self, overrides: RetryOptions) -> Self {
        Self {
            wait_ratio: overrides.wait_ratio.or(self.wait_ratio),
            retries: overrides.retries.or(self.retries),
            jitter: overrides.jitter.or(self.jitter),
            maximum_backoff: overrides.maximum_backoff.or(self.maximum_backoff),
        }
    }

    /// Validate and fill in defaults.
    pub fn resolve(&self) -> Result<RetryConfig, ValidationError> {
        validate_options(self)
    }
}

/// Resolved retry configuration. Immutable once built.
///
/// Only produced by validation; see [`RetryOptions::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Base multiplier for backoff in milliseconds.
    pub wait_ratio: f64,

    /// Maximum number of retries after the first attempt.
    pub retries: u32,

    /// Whether waits use full jitter.
    pub jitter: bool,

    /// Cap on any single wait in milliseconds. Infinite when uncapped.
    pub maximum_backoff: f64,
}

impl RetryConfig {
    /// Whether a finite cap was configured.
    pub fn is_capped(&self) -> bool {
        self.maximum_backoff.is_finite()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            wait_ratio: DEFAULT_WAIT_RATIO,
            retries: DEFAULT_RETRIES,
            jitter: DEFAULT_JITTER,
            maximum_backoff: f64::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_resolve_to_defaults() {
        let config = RetryOptions::new().resolve().unwrap();
        assert_eq!(config, RetryConfig::default());
        assert_eq!(config.wait_ratio, 100.0);
        assert_eq!(config.retries, 8);
        assert!(config.jitter);
        assert!(!config.is_capped());
    }

    #[test]
    fn test_partial_options_keep_other_defaults() {
        let config = RetryOptions::new().retries(2).jitter(false).resolve().unwrap();
        assert_eq!(config.retries, 2);
        assert!(!config.jitter);
        assert_eq!(config.wait_ratio, DEFAULT_WAIT_RATIO);
        assert_eq!(config.maximum_backoff, f64::INFINITY);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = RetryOptions::new().retries(3).wait_ratio(50.0);
        let flags = RetryOptions::new().wait_ratio(10.0).maximum_backoff(500.0);
        let merged = file.merge(flags);

        assert_eq!(merged.retries, Some(3));
        assert_eq!(merged.wait_ratio, Some(10.0));
        assert_eq!(merged.maximum_backoff, Some(500.0));
        assert_eq!(merged.jitter, None);
    }
}
