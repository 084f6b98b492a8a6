//! Message assembly.
//!
//! Maps the run context, job report, and configuration onto a wire payload.
//! All human-readable parts go through named-field interpolation; the
//! variable map is assembled once per build and shared by every template.

use crate::config::{Config, FieldConfig};
use crate::schema::{Attachment, AttachmentField, Message};
use crate::status::{JobStatus, JobSteps};
use crate::template::TemplateContext;
use chime_github::ActionsContext;
use chrono::Utc;
use std::collections::BTreeMap;

const DEFAULT_FALLBACK: &str =
    "[{{repository}}] {{workflow}} #{{runNumber}} {{jobName}} is {{jobStatus}}";
const DEFAULT_PRETEXT: &str = "Triggered via {{eventName}} by {{actor}}";
const DEFAULT_TEXT: &str = "*<{{runUrl}}|Workflow _{{workflow}}_ job _{{jobName}}_ \
                            triggered by _{{eventName}}_ is _{{jobStatus}}_>* \
                            for <{{refUrl}}|`{{ref}}`>\n{{commits}}";
const DEFAULT_FOOTER: &str = "<{{repositoryUrl}}|{{repository}}> {{workflow}} #{{runNumber}}";

/// Builds one notification payload from a run context and a job report.
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
    context: &'a ActionsContext,
    job_name: String,
    status: JobStatus,
    steps: JobSteps,
    channel: Option<String>,
    message: Option<String>,
    extra: BTreeMap<String, String>,
    config: Config,
}

impl<'a> MessageBuilder<'a> {
    /// Create a builder for the given run context, job name, and status.
    #[must_use]
    pub fn new(context: &'a ActionsContext, job_name: impl Into<String>, status: JobStatus) -> Self {
        Self {
            context,
            job_name: job_name.into(),
            status,
            steps: JobSteps::new(),
            channel: None,
            message: None,
            extra: BTreeMap::new(),
            config: Config::default(),
        }
    }

    /// Attach per-step outcomes for the "Job Steps" section.
    #[must_use]
    pub fn with_steps(mut self, steps: JobSteps) -> Self {
        self.steps = steps;
        self
    }

    /// Override the target channel.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Replace the body template with a caller-supplied message.
    ///
    /// The message is still interpolated against the variable map.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Merge extra template fields; they override computed variables on
    /// key collision.
    #[must_use]
    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra = extra;
        self
    }

    /// Apply a configuration document.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Assemble the payload in the shape the configuration selects.
    #[must_use]
    pub fn build(&self) -> Message {
        let vars = self.variables();
        let fallback = vars.render(
            self.config.fallback.as_deref().unwrap_or(DEFAULT_FALLBACK),
        );

        if let Some(blocks) = &self.config.blocks {
            return Message {
                username: self.config.username.clone(),
                icon_url: self.config.icon_url.clone(),
                channel: self.channel.clone(),
                text: Some(fallback),
                attachments: Vec::new(),
                blocks: Some(vars.render_value(blocks)),
            };
        }

        let text_template = self
            .message
            .as_deref()
            .or(self.config.text.as_deref())
            .unwrap_or(DEFAULT_TEXT);

        let attachment = Attachment {
            fallback: Some(fallback),
            color: Some(self.config.color(self.status)),
            author_name: non_empty(self.author_name()),
            author_link: non_empty(self.author_link()),
            author_icon: non_empty(self.author_icon()),
            mrkdwn_in: vec![
                "pretext".to_string(),
                "text".to_string(),
                "fields".to_string(),
            ],
            pretext: non_empty(
                vars.render(self.config.pretext.as_deref().unwrap_or(DEFAULT_PRETEXT)),
            ),
            text: non_empty(vars.render(text_template)),
            title: self.config.title.as_deref().map(|t| vars.render(t)),
            title_link: self.config.title_link.as_deref().map(|t| vars.render(t)),
            fields: self.render_fields(&vars),
            footer: non_empty(
                vars.render(self.config.footer.as_deref().unwrap_or(DEFAULT_FOOTER)),
            ),
            footer_icon: self.config.footer_icon.as_deref().map(|t| vars.render(t)),
            ts: Some(Utc::now().timestamp().to_string()),
        };

        Message {
            username: self.config.username.clone(),
            icon_url: self.config.icon_url.clone(),
            channel: self.channel.clone(),
            text: None,
            attachments: vec![attachment],
            blocks: None,
        }
    }

    /// Assemble the template variable map for this build.
    #[must_use]
    pub fn variables(&self) -> TemplateContext {
        let context = self.context;
        let mut vars = TemplateContext::new();
        vars.set("repository", &context.repository);
        vars.set("repositoryUrl", context.repository_url());
        vars.set("workflow", &context.workflow);
        vars.set("workflowUrl", context.workflow_url());
        vars.set("runId", &context.run_id);
        vars.set("runNumber", &context.run_number);
        vars.set("runUrl", context.run_url());
        vars.set("sha", &context.sha);
        vars.set("shortSha", context.short_sha());
        vars.set("ref", &context.ref_name);
        vars.set("refType", &context.ref_type);
        vars.set("refUrl", context.ref_url());
        vars.set("actor", &context.actor);
        vars.set("actorUrl", context.actor_url());
        vars.set("eventName", &context.event_name);
        vars.set("diffRef", context.short_sha());
        vars.set("diffUrl", context.compare_url().unwrap_or_default());
        vars.set("description", self.description());
        vars.set("jobName", &self.job_name);
        vars.set("jobStatus", self.status.as_str());
        vars.set("jobSteps", self.job_steps_summary());
        vars.set("commits", self.commit_section());
        if let Some(channel) = &self.channel {
            vars.set("channel", channel);
        }
        vars.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars
    }

    /// One glyph + name line per step, in insertion order.
    ///
    /// Steps whose outcome is `skipped` are omitted from the listing.
    #[must_use]
    pub fn job_steps_summary(&self) -> String {
        let mut summary = String::new();
        for (name, step) in &self.steps {
            if step.outcome == JobStatus::Skipped {
                continue;
            }
            summary.push_str(&self.config.glyph(step.outcome));
            summary.push(' ');
            summary.push_str(name);
            summary.push('\n');
        }
        summary
    }

    /// Compare link plus one line per commit, empty when the event carries
    /// no commits.
    #[must_use]
    pub fn commit_section(&self) -> String {
        let Some(payload) = &self.context.payload else {
            return String::new();
        };
        if payload.commits.is_empty() {
            return String::new();
        }

        let mut section = String::new();
        if let Some(diff_url) = self.context.compare_url() {
            section.push_str(&format!(
                "<{}|`{}`> - {} commits\n",
                diff_url,
                self.context.short_sha(),
                payload.commits.len()
            ));
        }
        section.push_str("*Commits*\n");
        for commit in &payload.commits {
            section.push_str(&format!(
                "<{}|`{}`> - {}\n",
                self.context.commit_url(&commit.id),
                commit.short_id(),
                commit.summary()
            ));
        }
        section
    }

    fn render_fields(&self, vars: &TemplateContext) -> Vec<AttachmentField> {
        let defaults = default_fields();
        let configured = self.config.fields.as_ref().unwrap_or(&defaults);
        configured
            .iter()
            .map(|field| {
                AttachmentField::new(
                    vars.render(&field.title),
                    vars.render(&field.value),
                    field.short,
                )
            })
            .collect()
    }

    fn description(&self) -> String {
        self.context
            .payload
            .as_ref()
            .and_then(|payload| payload.pull_request.as_ref())
            .map(|pr| pr.title.clone())
            .unwrap_or_default()
    }

    fn author_name(&self) -> String {
        self.sender_field(|sender| sender.login.clone())
            .unwrap_or_else(|| self.context.actor.clone())
    }

    fn author_link(&self) -> String {
        self.sender_field(|sender| sender.html_url.clone())
            .unwrap_or_else(|| self.context.actor_url())
    }

    fn author_icon(&self) -> String {
        self.sender_field(|sender| sender.avatar_url.clone())
            .unwrap_or_default()
    }

    fn sender_field(&self, pick: impl Fn(&chime_github::Sender) -> String) -> Option<String> {
        self.context
            .payload
            .as_ref()
            .and_then(|payload| payload.sender.as_ref())
            .map(pick)
            .filter(|value| !value.is_empty())
    }
}

/// The default attachment field set.
fn default_fields() -> Vec<FieldConfig> {
    [
        ("Job Steps", "{{jobSteps}}", false),
        ("Workflow", "<{{workflowUrl}}|{{workflow}}>", true),
        ("Git Ref", "{{ref}} ({{refType}})", true),
        ("Run ID", "<{{runUrl}}|{{runId}}>", true),
        ("Run Number", "{{runNumber}}", true),
        ("Actor", "{{actor}}", true),
        ("Job Status", "{{jobStatus}}", true),
    ]
    .into_iter()
    .map(|(title, value, short)| FieldConfig {
        title: title.to_string(),
        value: value.to_string(),
        short,
    })
    .collect()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chime_github::{Commit, EventPayload};
    use indexmap::indexmap;
    use crate::status::StepReport;

    fn make_context() -> ActionsContext {
        ActionsContext {
            event_name: "push".to_string(),
            git_ref: "refs/heads/master".to_string(),
            ref_name: "master".to_string(),
            ref_type: "branch".to_string(),
            sha: "68d48876e0794fba714cb331a1624af6b20942d8".to_string(),
            actor: "satterly".to_string(),
            workflow: "build-test".to_string(),
            run_id: "100143423".to_string(),
            run_number: "8".to_string(),
            repository: "chime-ci/chime".to_string(),
            ..ActionsContext::default()
        }
    }

    fn make_commit(id: &str, message: &str) -> Commit {
        Commit {
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    fn step(outcome: JobStatus) -> StepReport {
        StepReport {
            outcome,
            conclusion: outcome,
        }
    }

    #[test]
    fn test_fallback_line() {
        let context = make_context();
        let message = MessageBuilder::new(&context, "CI Tests", JobStatus::Failure).build();

        assert_eq!(
            message.attachments[0].fallback.as_deref(),
            Some("[chime-ci/chime] build-test #8 CI Tests is failure")
        );
    }

    #[test]
    fn test_commit_section_lists_commits_in_event_order() {
        let mut context = make_context();
        context.payload = Some(EventPayload {
            compare: Some(
                "https://github.com/chime-ci/chime/compare/db9fe60430a6...68d48876e079"
                    .to_string(),
            ),
            commits: vec![
                make_commit("b1f512300ea6e925e095c51a441fcf30104523aa", "wip"),
                make_commit("68d48876e0794fba714cb331a1624af6b20942d8", "wip\nbody"),
            ],
            ..EventPayload::default()
        });

        let builder = MessageBuilder::new(&context, "CI Tests", JobStatus::Success);
        let section = builder.commit_section();

        let lines: Vec<&str> = section.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "<https://github.com/chime-ci/chime/compare/db9fe60430a6...68d48876e079|`68d48876`> - 2 commits"
        );
        assert_eq!(lines[1], "*Commits*");
        assert_eq!(
            lines[2],
            "<https://github.com/chime-ci/chime/commit/b1f512300ea6e925e095c51a441fcf30104523aa|`b1f51230`> - wip"
        );
        // Only the first message line is shown.
        assert!(lines[3].ends_with("|`68d48876`> - wip"));
    }

    #[test]
    fn test_commit_section_empty_without_commits() {
        let context = make_context();
        let builder = MessageBuilder::new(&context, "CI Tests", JobStatus::Success);
        assert_eq!(builder.commit_section(), "");
    }

    #[test]
    fn test_job_steps_in_insertion_order_skipping_skipped() {
        let context = make_context();
        let steps: JobSteps = indexmap! {
            "install-deps".to_string() => step(JobStatus::Success),
            "hooks".to_string() => step(JobStatus::Cancelled),
            "lint".to_string() => step(JobStatus::Failure),
            "types".to_string() => step(JobStatus::Skipped),
            "unit-test".to_string() => step(JobStatus::Skipped),
            "integration-test".to_string() => step(JobStatus::Failure),
        };

        let builder =
            MessageBuilder::new(&context, "CI Tests", JobStatus::Failure).with_steps(steps);

        assert_eq!(
            builder.job_steps_summary(),
            ":white_check_mark: install-deps\n:x: hooks\n:grimacing: lint\n:grimacing: integration-test\n"
        );
    }

    #[test]
    fn test_extra_fields_override_computed_variables() {
        let context = make_context();
        let extra = BTreeMap::from([
            ("workflow".to_string(), "renamed".to_string()),
            ("custom".to_string(), "value".to_string()),
        ]);

        let builder = MessageBuilder::new(&context, "CI Tests", JobStatus::Success)
            .with_extra(extra);
        let vars = builder.variables();

        assert_eq!(vars.get("workflow"), Some("renamed"));
        assert_eq!(vars.get("custom"), Some("value"));
    }

    #[test]
    fn test_message_override_replaces_text_template() {
        let context = make_context();
        let message = MessageBuilder::new(&context, "CI Tests", JobStatus::Success)
            .with_message("deploy of {{shortSha}} done")
            .build();

        assert_eq!(
            message.attachments[0].text.as_deref(),
            Some("deploy of 68d48876 done")
        );
    }

    #[test]
    fn test_default_field_set() {
        let context = make_context();
        let message = MessageBuilder::new(&context, "CI Tests", JobStatus::Failure).build();

        let fields = &message.attachments[0].fields;
        let titles: Vec<&str> = fields.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Job Steps",
                "Workflow",
                "Git Ref",
                "Run ID",
                "Run Number",
                "Actor",
                "Job Status"
            ]
        );
        assert_eq!(fields[2].value, "master (branch)");
        assert_eq!(fields[6].value, "failure");
    }

    #[test]
    fn test_blocks_config_switches_payload_shape() {
        let context = make_context();
        let config = Config {
            blocks: Some(serde_json::json!([
                {"type": "section", "text": {"type": "mrkdwn", "text": "{{jobName}} is {{jobStatus}}"}}
            ])),
            ..Config::default()
        };

        let message = MessageBuilder::new(&context, "CI Tests", JobStatus::Success)
            .with_channel("#github-ci")
            .with_config(config)
            .build();

        assert!(message.attachments.is_empty());
        assert_eq!(message.channel.as_deref(), Some("#github-ci"));
        assert_eq!(
            message.text.as_deref(),
            Some("[chime-ci/chime] build-test #8 CI Tests is success")
        );
        let blocks = message.blocks.unwrap();
        assert_eq!(blocks[0]["text"]["text"], "CI Tests is success");
    }

    #[test]
    fn test_empty_context_renders_empty_substitutions() {
        let context = ActionsContext::default();
        let message = MessageBuilder::new(&context, "", JobStatus::Unknown).build();

        let attachment = &message.attachments[0];
        assert_eq!(attachment.fallback.as_deref(), Some("[]  #  is unknown"));
        assert_eq!(attachment.color.as_deref(), Some("#C0C0C0"));
        assert!(attachment.ts.as_deref().is_some_and(|ts| {
            ts.chars().all(|c| c.is_ascii_digit())
        }));
    }
}
