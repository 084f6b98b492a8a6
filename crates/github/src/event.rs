//! Webhook event payload types.
//!
//! A partial view of the event document GitHub writes to `GITHUB_EVENT_PATH`.
//! Only the fields the notification formatter consumes are modeled; everything
//! else in the document is ignored during deserialization.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parsed event payload for the triggering event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Commits contained in a push event, in event order.
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// Compare URL for the pushed range, when the event carries one.
    #[serde(default)]
    pub compare: Option<String>,
    /// SHA the ref pointed at before the push.
    #[serde(default)]
    pub before: Option<String>,
    /// The user that triggered the event.
    #[serde(default)]
    pub sender: Option<Sender>,
    /// Pull request details for `pull_request` events.
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

impl EventPayload {
    /// Load and parse an event payload document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading event payload");
        let document = std::fs::read_to_string(path)?;
        serde_json::from_str(&document).map_err(|e| Error::payload(path, e.to_string()))
    }
}

/// A single commit as reported in a push event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit SHA.
    pub id: String,
    /// Full commit message.
    #[serde(default)]
    pub message: String,
}

impl Commit {
    /// Abbreviated 8-character commit id.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// First line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// The account that triggered the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Account login.
    #[serde(default)]
    pub login: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: String,
}

/// Pull request details for `pull_request` events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    #[serde(default)]
    pub number: u64,
    /// Pull request title.
    #[serde(default)]
    pub title: String,
    /// Pull request page URL.
    #[serde(default)]
    pub html_url: String,
}
