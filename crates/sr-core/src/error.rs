//! Core error type.
//!
//! Downstream crates define their own error enums and wrap `CoreError` where
//! a core operation (coordinate parsing, config validation) can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate {input:?}: {reason}")]
    InvalidCoordinate { input: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
