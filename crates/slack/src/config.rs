//! Notification configuration document.
//!
//! A small YAML document controlling message shape: templates, colors,
//! glyphs, and optionally a Block Kit tree. Every field is optional and
//! unknown keys are ignored, so a malformed-but-parseable document degrades
//! to defaults instead of failing the notification.

use crate::error::{Error, Result};
use crate::status::JobStatus;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A single attachment field template.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    /// Field title shown in bold.
    pub title: String,
    /// Field value template.
    pub value: String,
    /// Whether the field renders side-by-side with its neighbor.
    #[serde(default)]
    pub short: bool,
}

/// Message configuration, deserialized from YAML.
///
/// Absent fields fall back to built-in defaults at assembly time. The
/// presence of a `blocks` tree switches the payload from the legacy
/// attachment shape to the Block Kit shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot username shown in the channel.
    pub username: Option<String>,
    /// Bot icon image URL.
    pub icon_url: Option<String>,
    /// Pretext template, shown above the attachment.
    pub pretext: Option<String>,
    /// Attachment title template.
    pub title: Option<String>,
    /// Attachment title link template.
    pub title_link: Option<String>,
    /// Attachment body template.
    pub text: Option<String>,
    /// Plain-text fallback template.
    pub fallback: Option<String>,
    /// Field templates replacing the default field set.
    pub fields: Option<Vec<FieldConfig>>,
    /// Footer template.
    pub footer: Option<String>,
    /// Footer icon URL.
    pub footer_icon: Option<String>,
    /// Status-name to attachment-color mapping; `default` is the fallback key.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    /// Status-name to step-glyph mapping; `default` is the fallback key.
    #[serde(default)]
    pub icons: BTreeMap<String, String>,
    /// Block Kit tree with template strings in its leaves.
    pub blocks: Option<serde_json::Value>,
}

impl Config {
    /// Parse a configuration document from YAML.
    pub fn from_yaml(document: &str) -> Result<Self> {
        serde_yaml::from_str(document).map_err(|e| Error::config(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let document = std::fs::read_to_string(path)?;
        Self::from_yaml(&document)
    }

    /// Attachment color for a status.
    ///
    /// Resolution order: configured entry for the status name, the
    /// configured `default` entry, the built-in table. Total over
    /// [`JobStatus`].
    #[must_use]
    pub fn color(&self, status: JobStatus) -> String {
        self.colors
            .get(status.as_str())
            .or_else(|| self.colors.get("default"))
            .cloned()
            .unwrap_or_else(|| status.default_color().to_string())
    }

    /// Step glyph for a status; same resolution order as [`Config::color`].
    #[must_use]
    pub fn glyph(&self, status: JobStatus) -> String {
        self.icons
            .get(status.as_str())
            .or_else(|| self.icons.get("default"))
            .cloned()
            .unwrap_or_else(|| status.default_glyph().to_string())
    }

    /// Whether this configuration selects the Block Kit payload shape.
    #[must_use]
    pub fn uses_blocks(&self) -> bool {
        self.blocks.is_some()
    }
}
