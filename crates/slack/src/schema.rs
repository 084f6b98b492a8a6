//! Slack webhook payload types.
//!
//! Wire shapes for an incoming-webhook POST body: the legacy attachment
//! format and the Block Kit format. Optional fields are omitted from the
//! serialized document rather than sent as nulls.

use serde::{Deserialize, Serialize};

/// An incoming-webhook message payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Bot username shown in the channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Bot icon image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// Target channel override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Top-level text; the fallback line in Block Kit payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Legacy attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Block Kit blocks, mutually exclusive with attachments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<serde_json::Value>,
}

/// A legacy-format message attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Plain-text summary for clients that cannot render the attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Accent color, a name ("good") or hex value ("#884EA0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Author display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Author profile link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,

    /// Author avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,

    /// Attachment parts rendered as markdown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mrkdwn_in: Vec<String>,

    /// Text shown above the attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,

    /// Attachment body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Attachment title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Title link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,

    /// Short metadata fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,

    /// Footer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Footer icon URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,

    /// Epoch timestamp as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

/// A titled value inside an attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    /// Field title shown in bold.
    pub title: String,
    /// Field value.
    pub value: String,
    /// Whether the field renders side-by-side with its neighbor.
    pub short: bool,
}

impl AttachmentField {
    /// Create a field.
    pub fn new(title: impl Into<String>, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short,
        }
    }
}
