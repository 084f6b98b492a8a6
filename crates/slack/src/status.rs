//! Job and step outcome classification.
//!
//! Outcomes map onto colors and glyphs through exhaustive match tables, so
//! selection is total: any value the host CI reports, including ones this
//! crate has never seen, resolves to the `Unknown` fallback rather than an
//! error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a job or a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The job or step completed successfully.
    Success,
    /// The job or step failed.
    Failure,
    /// The job or step was cancelled.
    Cancelled,
    /// The step was skipped, usually because an earlier step failed.
    Skipped,
    /// Any status value this crate does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Lowercase status name as reported by the host CI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Failure => "failure",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Skipped => "skipped",
            JobStatus::Unknown => "unknown",
        }
    }

    /// Built-in attachment color for this status.
    #[must_use]
    pub const fn default_color(self) -> &'static str {
        match self {
            JobStatus::Success => "good",
            JobStatus::Failure => "danger",
            JobStatus::Cancelled => "warning",
            JobStatus::Skipped | JobStatus::Unknown => "#C0C0C0",
        }
    }

    /// Built-in step glyph for this status.
    #[must_use]
    pub const fn default_glyph(self) -> &'static str {
        match self {
            JobStatus::Success => ":white_check_mark:",
            JobStatus::Failure => ":grimacing:",
            JobStatus::Cancelled => ":x:",
            JobStatus::Skipped => ":heavy_minus_sign:",
            JobStatus::Unknown => ":shrug:",
        }
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "success" => JobStatus::Success,
            "failure" => JobStatus::Failure,
            "cancelled" => JobStatus::Cancelled,
            "skipped" => JobStatus::Skipped,
            _ => JobStatus::Unknown,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single step as reported by the host CI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Outcome before `continue-on-error` is applied.
    #[serde(default)]
    pub outcome: JobStatus,
    /// Final conclusion after `continue-on-error` is applied.
    #[serde(default)]
    pub conclusion: JobStatus,
}

/// Ordered step-name to report mapping; insertion order is rendering order.
pub type JobSteps = IndexMap<String, StepReport>;
