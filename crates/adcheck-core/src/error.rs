//! Error types for adcheck-core.
//!
//! Validation itself never fails: a bundle that breaks the rules produces a
//! report, not an error. These types cover the ambient edges (loading
//! configuration, decoding input documents).

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while decoding validator input.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input is not valid JSON or does not have the expected shape.
    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`InputError`].
pub type InputResult<T> = Result<T, InputError>;
