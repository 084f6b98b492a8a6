//! chime CLI.
//!
//! Thin wiring around `chime-slack`: resolve the run context from the
//! environment, parse the caller-supplied job report, load the optional
//! configuration document, send one notification, print the webhook
//! response. A failed send exits non-zero so a CI step can fail on it.

// CLI binary prints the webhook response to stdout by design.
#![allow(clippy::print_stdout)]

use chime_github::ActionsContext;
use chime_slack::{Config, JobStatus, JobSteps};
use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chime", version, about = "Post a CI job's status to a Slack webhook")]
struct Cli {
    /// Slack incoming-webhook URL.
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: String,

    /// Job status to report (success, failure, cancelled, skipped).
    #[arg(long, default_value = "success")]
    status: String,

    /// Job name shown in the notification.
    #[arg(long, env = "GITHUB_JOB", default_value = "build")]
    job_name: String,

    /// Step results as a JSON document, e.g. the host CI's `toJson(steps)`.
    #[arg(long, default_value = "{}")]
    steps: String,

    /// Target channel override, e.g. "#github-ci".
    #[arg(long)]
    channel: Option<String>,

    /// Free-text message replacing the default body template.
    #[arg(long)]
    message: Option<String>,

    /// Extra template field, KEY=VALUE; may be repeated.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Path to a YAML configuration document.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let context = ActionsContext::from_env_strict()
        .into_diagnostic()
        .wrap_err("failed to resolve the run context")?;
    debug!(%context, "Resolved run context");

    let config = match &cli.config {
        Some(path) => Config::from_path(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let steps = parse_steps(&cli.steps)
        .into_diagnostic()
        .wrap_err("invalid --steps document")?;

    let response = chime_slack::send(
        &cli.webhook_url,
        &cli.job_name,
        JobStatus::from(cli.status.as_str()),
        steps,
        cli.channel.as_deref(),
        cli.message.as_deref(),
        parse_fields(&cli.fields),
        config,
        &context,
    )
    .await
    .into_diagnostic()
    .wrap_err("webhook delivery failed")?;

    println!("{response}");
    Ok(())
}

/// Parse the step report document, preserving step order.
fn parse_steps(document: &str) -> Result<JobSteps, serde_json::Error> {
    serde_json::from_str(document)
}

/// Split repeated KEY=VALUE arguments into a template field map.
///
/// Arguments without a `=` are ignored.
fn parse_fields(fields: &[String]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|field| field.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps_preserves_order() {
        let steps = parse_steps(
            r#"{"build": {"outcome": "success", "conclusion": "success"},
                "test": {"outcome": "failure", "conclusion": "failure"}}"#,
        )
        .unwrap();

        let names: Vec<&str> = steps.keys().map(String::as_str).collect();
        assert_eq!(names, ["build", "test"]);
        assert_eq!(steps["test"].outcome, JobStatus::Failure);
    }

    #[test]
    fn test_parse_steps_rejects_malformed_document() {
        assert!(parse_steps("not json").is_err());
    }

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields(&[
            "environment=staging".to_string(),
            "region=eu-west-1".to_string(),
            "malformed".to_string(),
        ]);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["environment"], "staging");
        assert_eq!(fields["region"], "eu-west-1");
    }

    #[test]
    fn test_unrecognized_status_falls_back() {
        assert_eq!(JobStatus::from("timed_out"), JobStatus::Unknown);
    }
}
