//! GitHub Actions run context for chime.
//!
//! Provides an explicit, immutable snapshot of the metadata a GitHub Actions
//! run exposes through `GITHUB_*` environment variables and the event payload
//! file. The snapshot is constructed once by the caller and injected into the
//! message formatter, so formatting code never reads process-global state.

pub mod context;
pub mod event;

pub use context::ActionsContext;
pub use event::{Commit, EventPayload, PullRequest, Sender};

use std::path::Path;
use thiserror::Error;

/// Errors raised while constructing the run context.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the event payload file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The event payload file did not contain valid JSON.
    #[error("Malformed event payload {}: {message}", path.display())]
    Payload {
        /// Path of the offending payload file.
        path: Box<Path>,
        /// Parser error message.
        message: String,
    },
}

impl Error {
    /// Build a [`Error::Payload`] for the given file.
    pub fn payload(path: &Path, message: impl Into<String>) -> Self {
        Error::Payload {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for context construction.
pub type Result<T> = std::result::Result<T, Error>;
