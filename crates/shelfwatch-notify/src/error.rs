//! Error types for notification delivery.

use thiserror::Error;

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notification delivery.
///
/// Note that an adapter failing to deliver is not an error; that is a
/// `false` from [`ChannelAdapter::send`](crate::ChannelAdapter::send).
/// These variants cover configuration and lookup problems.
#[derive(Debug, Error)]
pub enum Error {
    /// User or preference not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No adapter registered for the channel.
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Adapter configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}
