//! Error types for the core pipeline.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Event not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage operation failed.
    #[error("Storage failed: {0}")]
    Storage(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}
