//! Run context resolved from the host environment.

use crate::event::EventPayload;
use crate::Result;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Placeholder SHA GitHub reports when a ref had no previous tip.
const NULL_SHA: &str = "0000000000000000000000000000000000000000";

/// Fallback server URL when `GITHUB_SERVER_URL` is unset.
const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Metadata about the workflow run that triggered a notification.
///
/// Constructed once per invocation, either from the environment via
/// [`ActionsContext::from_env`] or field-by-field in tests, and passed by
/// reference into the formatter. Missing environment variables become empty
/// strings; formatting treats them as empty substitutions rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionsContext {
    /// The event that triggered the run (e.g. "push", "pull_request").
    pub event_name: String,
    /// Full git ref (e.g. "refs/heads/master").
    pub git_ref: String,
    /// Short ref name (e.g. "master").
    pub ref_name: String,
    /// Ref type, "branch" or "tag".
    pub ref_type: String,
    /// Commit SHA the run is building.
    pub sha: String,
    /// Login of the user that initiated the run.
    pub actor: String,
    /// Workflow name.
    pub workflow: String,
    /// Unique run id.
    pub run_id: String,
    /// Per-workflow run counter.
    pub run_number: String,
    /// Repository in "owner/name" form.
    pub repository: String,
    /// Server base URL.
    pub server_url: String,
    /// Parsed event payload, when one was available.
    pub payload: Option<EventPayload>,
}

impl Default for ActionsContext {
    fn default() -> Self {
        Self {
            event_name: String::new(),
            git_ref: String::new(),
            ref_name: String::new(),
            ref_type: String::new(),
            sha: String::new(),
            actor: String::new(),
            workflow: String::new(),
            run_id: String::new(),
            run_number: String::new(),
            repository: String::new(),
            server_url: String::from(DEFAULT_SERVER_URL),
            payload: None,
        }
    }
}

impl ActionsContext {
    /// Build the context from `GITHUB_*` environment variables.
    ///
    /// A missing or malformed event payload file is logged and skipped; use
    /// [`ActionsContext::from_env_strict`] to surface it instead.
    #[must_use]
    pub fn from_env() -> Self {
        let mut context = Self::from_env_without_payload();
        context.payload = payload_path().and_then(|path| {
            EventPayload::from_path(&path)
                .map_err(|e| warn!(error = %e, "Ignoring unreadable event payload"))
                .ok()
        });
        context
    }

    /// Build the context from the environment, failing on an unreadable
    /// event payload.
    pub fn from_env_strict() -> Result<Self> {
        let mut context = Self::from_env_without_payload();
        if let Some(path) = payload_path() {
            context.payload = Some(EventPayload::from_path(&path)?);
        }
        Ok(context)
    }

    fn from_env_without_payload() -> Self {
        Self {
            event_name: env_or_default("GITHUB_EVENT_NAME"),
            git_ref: env_or_default("GITHUB_REF"),
            ref_name: env_or_default("GITHUB_REF_NAME"),
            ref_type: env_or_default("GITHUB_REF_TYPE"),
            sha: env_or_default("GITHUB_SHA"),
            actor: env_or_default("GITHUB_ACTOR"),
            workflow: env_or_default("GITHUB_WORKFLOW"),
            run_id: env_or_default("GITHUB_RUN_ID"),
            run_number: env_or_default("GITHUB_RUN_NUMBER"),
            repository: env_or_default("GITHUB_REPOSITORY"),
            server_url: std::env::var("GITHUB_SERVER_URL")
                .unwrap_or_else(|_| String::from(DEFAULT_SERVER_URL)),
            payload: None,
        }
    }

    /// Abbreviated 8-character commit SHA.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    /// Repository page URL.
    #[must_use]
    pub fn repository_url(&self) -> String {
        format!("{}/{}", self.server_url, self.repository)
    }

    /// URL listing runs of this workflow.
    #[must_use]
    pub fn workflow_url(&self) -> String {
        format!(
            "{}/actions?query=workflow:{}",
            self.repository_url(),
            self.workflow
        )
    }

    /// URL of this workflow run.
    #[must_use]
    pub fn run_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repository_url(), self.run_id)
    }

    /// URL of the commit listing for the triggering ref.
    #[must_use]
    pub fn ref_url(&self) -> String {
        format!("{}/commits/{}", self.repository_url(), self.ref_name)
    }

    /// Profile URL of the actor.
    #[must_use]
    pub fn actor_url(&self) -> String {
        format!("{}/{}", self.server_url, self.actor)
    }

    /// URL of a single commit in this repository.
    #[must_use]
    pub fn commit_url(&self, id: &str) -> String {
        format!("{}/commit/{}", self.repository_url(), id)
    }

    /// Compare URL for the pushed range.
    ///
    /// Prefers the URL the event payload carries; falls back to constructing
    /// one from the payload's `before` SHA. `None` when the event has no
    /// usable range (e.g. a branch creation, where `before` is the null SHA).
    #[must_use]
    pub fn compare_url(&self) -> Option<String> {
        let payload = self.payload.as_ref()?;
        if let Some(compare) = &payload.compare {
            return Some(compare.clone());
        }
        let before = payload.before.as_deref()?;
        if before.is_empty() || before == NULL_SHA {
            return None;
        }
        Some(format!(
            "{}/compare/{}...{}",
            self.repository_url(),
            before.get(..12).unwrap_or(before),
            self.sha.get(..12).unwrap_or(&self.sha)
        ))
    }
}

impl fmt::Display for ActionsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} ({})",
            self.event_name,
            self.ref_name,
            self.short_sha()
        )
    }
}

fn env_or_default(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn payload_path() -> Option<std::path::PathBuf> {
    std::env::var("GITHUB_EVENT_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(|p| Path::new(&p).to_path_buf())
}
