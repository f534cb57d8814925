//! Structured error types for the Velella workspace.

use thiserror::Error;

/// Unified error type for all Velella operations.
#[derive(Debug, Error)]
pub enum VelellaError {
    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Mutation attempted on a structure that has been frozen
    #[error("frozen: {0}")]
    Frozen(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the Velella workspace.
pub type Result<T> = std::result::Result<T, VelellaError>;
