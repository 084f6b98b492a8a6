//! Error types for message formatting and delivery.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or delivering a notification.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration document failed to parse.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The webhook request could not be completed.
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("Webhook returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },
}

impl Error {
    /// Build a [`Error::Config`] from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
