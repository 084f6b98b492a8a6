//! Integration tests for environment-based context construction.
//!
//! These drive [`chime_github::ActionsContext::from_env`] against a
//! controlled environment, including a real event payload file on disk.

use chime_github::ActionsContext;
use std::path::Path;

fn fixture_path(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

/// The variables a push-triggered run exposes.
fn push_env(event_path: &str) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("GITHUB_EVENT_NAME", Some("push".to_string())),
        ("GITHUB_REF", Some("refs/heads/master".to_string())),
        ("GITHUB_REF_NAME", Some("master".to_string())),
        ("GITHUB_REF_TYPE", Some("branch".to_string())),
        (
            "GITHUB_SHA",
            Some("68d48876e0794fba714cb331a1624af6b20942d8".to_string()),
        ),
        ("GITHUB_ACTOR", Some("satterly".to_string())),
        ("GITHUB_WORKFLOW", Some("build-test".to_string())),
        ("GITHUB_RUN_ID", Some("100143423".to_string())),
        ("GITHUB_RUN_NUMBER", Some("8".to_string())),
        ("GITHUB_REPOSITORY", Some("chime-ci/chime".to_string())),
        ("GITHUB_SERVER_URL", Some("https://github.com".to_string())),
        ("GITHUB_EVENT_PATH", Some(event_path.to_string())),
    ]
}

#[test]
fn builds_context_from_push_environment() {
    let event_path = fixture_path("push.json");
    temp_env::with_vars(push_env(&event_path), || {
        let context = ActionsContext::from_env();

        assert_eq!(context.event_name, "push");
        assert_eq!(context.ref_name, "master");
        assert_eq!(context.short_sha(), "68d48876");
        assert_eq!(context.workflow, "build-test");
        assert_eq!(context.run_number, "8");

        let payload = context.payload.as_ref().expect("payload should load");
        assert_eq!(payload.commits.len(), 4);
        assert_eq!(payload.commits[0].short_id(), "b1f51230");
        assert_eq!(
            context.compare_url().as_deref(),
            Some("https://github.com/chime-ci/chime/compare/db9fe60430a6...68d48876e079")
        );
    });
}

#[test]
fn missing_variables_become_empty_strings() {
    temp_env::with_vars_unset(
        [
            "GITHUB_EVENT_NAME",
            "GITHUB_REF",
            "GITHUB_REF_NAME",
            "GITHUB_REF_TYPE",
            "GITHUB_SHA",
            "GITHUB_ACTOR",
            "GITHUB_WORKFLOW",
            "GITHUB_RUN_ID",
            "GITHUB_RUN_NUMBER",
            "GITHUB_REPOSITORY",
            "GITHUB_SERVER_URL",
            "GITHUB_EVENT_PATH",
        ],
        || {
            let context = ActionsContext::from_env();
            assert_eq!(context.event_name, "");
            assert_eq!(context.repository, "");
            assert_eq!(context.server_url, "https://github.com");
            assert!(context.payload.is_none());
        },
    );
}

#[test]
fn unreadable_payload_is_skipped_leniently() {
    temp_env::with_var(
        "GITHUB_EVENT_PATH",
        Some("/nonexistent/event.json"),
        || {
            let context = ActionsContext::from_env();
            assert!(context.payload.is_none());
        },
    );
}

#[test]
fn strict_construction_surfaces_payload_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("event.json");
    std::fs::write(&path, "{ not json").expect("write fixture");

    temp_env::with_var(
        "GITHUB_EVENT_PATH",
        Some(path.display().to_string()),
        || {
            let result = ActionsContext::from_env_strict();
            assert!(result.is_err());
        },
    );
}
