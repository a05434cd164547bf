//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RetryOptions;
use crate::config::validation::{validate_options, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Parse retry options from TOML text.
///
/// Options may sit at the top level or under a `[retry]` table; the table
/// wins where both set a field. Unknown keys at either level are rejected,
/// and ranges are checked here so a bad file fails before anything is wrapped.
pub fn parse_options(content: &str) -> Result<RetryOptions, ConfigError> {
    let mut document: toml::Table = toml::from_str(content)?;

    let table: RetryOptions = match document.remove("retry") {
        Some(value) => value.try_into()?,
        None => RetryOptions::default(),
    };
    let top_level: RetryOptions = toml::Value::Table(document).try_into()?;
    let options = top_level.merge(table);

    validate_options(&options)?;

    Ok(options)
}

/// Load and validate retry options from a TOML file.
pub fn load_options(path: &Path) -> Result<RetryOptions, ConfigError> {
    let content = fs::read_to_string(path)?;
    let options = parse_options(&content)?;

    tracing::debug!(path = ?path, ?options, "Retry options loaded");

    Ok(options)
}
