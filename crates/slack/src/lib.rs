//! Slack notification formatting and delivery for chime.
//!
//! The crate turns a CI job result plus a [`chime_github::ActionsContext`]
//! into a Slack incoming-webhook payload and POSTs it. Formatting is pure:
//! payload assembly never touches the network or process environment, so
//! the whole pipeline short of the final POST is testable offline.
//!
//! ```no_run
//! use chime_github::ActionsContext;
//! use chime_slack::{send, Config, JobStatus, JobSteps};
//! use std::collections::BTreeMap;
//!
//! # async fn notify() -> chime_slack::Result<()> {
//! let context = ActionsContext::from_env();
//! let response = send(
//!     "https://hooks.slack.com/services/T00/B00/XXX",
//!     "CI Tests",
//!     JobStatus::Failure,
//!     JobSteps::new(),
//!     Some("#github-ci"),
//!     None,
//!     BTreeMap::new(),
//!     Config::default(),
//!     &context,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod schema;
pub mod status;
pub mod template;
pub mod webhook;

pub use config::{Config, FieldConfig};
pub use error::{Error, Result};
pub use message::MessageBuilder;
pub use schema::{Attachment, AttachmentField, Message};
pub use status::{JobStatus, JobSteps, StepReport};
pub use template::TemplateContext;
pub use webhook::WebhookClient;

use chime_github::ActionsContext;
use std::collections::BTreeMap;

/// Format a notification and deliver it with a single POST.
///
/// Exactly one outbound network call; the parsed response body is returned
/// on success, and a non-2xx response or transport failure is an error.
#[allow(clippy::too_many_arguments)]
pub async fn send(
    url: &str,
    job_name: &str,
    status: JobStatus,
    steps: JobSteps,
    channel: Option<&str>,
    message: Option<&str>,
    extra: BTreeMap<String, String>,
    config: Config,
    context: &ActionsContext,
) -> Result<serde_json::Value> {
    let mut builder = MessageBuilder::new(context, job_name, status)
        .with_steps(steps)
        .with_extra(extra)
        .with_config(config);
    if let Some(channel) = channel {
        builder = builder.with_channel(channel);
    }
    if let Some(message) = message {
        builder = builder.with_message(message);
    }

    WebhookClient::new(url).send(&builder.build()).await
}
