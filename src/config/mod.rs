//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! RetryOptions (builder, TOML file, CLI flags)
//!     → loader.rs (parse & deserialize, optional)
//!     → validation.rs (range checks, defaults)
//!     → RetryConfig (validated, immutable)
//!     → shared via Arc by every invocation of a wrapped operation
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; a new policy needs a new wrapper
//! - All fields have defaults to allow empty options
//! - Validation separates syntactic (serde) from range checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RetryConfig;
pub use schema::RetryOptions;
pub use validation::ValidationError;
