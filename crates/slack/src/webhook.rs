//! Webhook delivery.
//!
//! One POST per invocation, no retries. The response body is handed back to
//! the caller: parsed as JSON when it parses, verbatim otherwise.

use crate::error::{Error, Result};
use crate::schema::Message;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

/// Client for a single Slack incoming-webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// Create a client for the given webhook URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// POST a payload to the webhook and return the response body.
    ///
    /// A transport failure or a non-2xx response is an error; the error for
    /// the latter carries the status code and body so the caller can decide
    /// whether to fail its CI step.
    pub async fn send(&self, message: &Message) -> Result<Value> {
        debug!(url = %self.url, "Posting webhook payload");

        let response = self.client.post(&self.url).json(message).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(status = %status, "Webhook accepted payload");
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body)))
    }
}
