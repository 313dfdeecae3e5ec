//! Error types and utilities for chatbridge

use thiserror::Error;

/// Result type alias for chatbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type shared by the chatbridge crates
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The global tracing subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// A string could not be parsed into a domain type
    #[error("Invalid {kind}: '{value}'")]
    Parse {
        /// Name of the type being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
