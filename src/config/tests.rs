//! Unit tests for configuration loading, precedence and settings assembly.

use std::io::Write;

use ortho_config::{MergeComposer, OrthoConfig};
use rstest::rstest;
use serde_json::{Value, json};

use super::SwitchyardConfig;
use crate::error::AutomationError;

/// Applies a configuration layer to the composer based on the layer type.
fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

fn build_config_from_layers(layers: Vec<(&str, Value)>) -> SwitchyardConfig {
    let mut composer = MergeComposer::new();
    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value);
    }
    SwitchyardConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

#[rstest]
#[case::file_overrides_defaults(
    vec![
        ("defaults", json!({"github_write_user": "default-bot"})),
        ("file", json!({"github_write_user": "file-bot"})),
    ],
    "file-bot",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![
        ("file", json!({"github_write_user": "file-bot"})),
        ("environment", json!({"github_write_user": "env-bot"})),
    ],
    "env-bot",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![
        ("environment", json!({"github_write_user": "env-bot"})),
        ("cli", json!({"github_write_user": "cli-bot"})),
    ],
    "cli-bot",
    "CLI should override environment"
)]
fn write_user_follows_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let config = build_config_from_layers(layers);
    assert_eq!(config.github_write_user, expected, "{message}");
}

#[rstest]
fn partial_overrides_preserve_lower_values() {
    let config = build_config_from_layers(vec![
        (
            "defaults",
            json!({
                "jira_base_url": "https://default.atlassian.net",
                "jira_email": "default@example.com",
            }),
        ),
        ("cli", json!({"jira_email": "cli@example.com"})),
    ]);

    assert_eq!(config.jira_email.as_deref(), Some("cli@example.com"));
    assert_eq!(
        config.jira_base_url.as_deref(),
        Some("https://default.atlassian.net"),
        "default base URL should be preserved"
    );
}

#[rstest]
fn unset_layers_keep_built_in_defaults() {
    let config = build_config_from_layers(vec![("defaults", json!({}))]);

    assert_eq!(config.github_write_user, "sr-devops");
    assert_eq!(config.github_api_url, "https://api.github.com");
    assert_eq!(config.jira_repository_field, "customfield_10060");
    assert!(!config.log_json, "JSON logs are opt-in");
}

#[rstest]
#[case::defaults("GitGuardian,Codecov", vec!["GitGuardian", "Codecov"])]
#[case::spaces_and_blanks(" Lint , ,Codecov ", vec!["Lint", "Codecov"])]
#[case::empty("", vec![])]
fn quiet_checks_split_on_commas(#[case] raw: &str, #[case] expected: Vec<&str>) {
    let config = SwitchyardConfig {
        quiet_checks: raw.to_owned(),
        ..SwitchyardConfig::default()
    };
    assert_eq!(config.quiet_check_names(), expected);
}

#[rstest]
fn event_name_falls_back_to_actions_variable() {
    let _guard = env_lock::lock_env([("GITHUB_EVENT_NAME", Some("check_suite"))]);
    let config = SwitchyardConfig::default();

    assert_eq!(config.resolve_event_name().ok().as_deref(), Some("check_suite"));
}

#[rstest]
fn explicit_token_wins_over_actions_variable() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
    let config = SwitchyardConfig {
        github_token: Some("cli-token".to_owned()),
        ..SwitchyardConfig::default()
    };

    assert_eq!(config.resolve_github_token().ok().as_deref(), Some("cli-token"));
}

#[rstest]
fn missing_token_is_a_configuration_error() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = SwitchyardConfig::default();

    assert!(matches!(
        config.resolve_github_token(),
        Err(AutomationError::Configuration { .. })
    ));
}

#[rstest]
fn organization_falls_back_to_repository_owner_then_default() {
    let config = SwitchyardConfig::default();
    {
        let _guard = env_lock::lock_env([("GITHUB_REPOSITORY_OWNER", Some("acme"))]);
        assert_eq!(config.resolve_organization(), "acme");
    }
    let _guard = env_lock::lock_env([("GITHUB_REPOSITORY_OWNER", None::<&str>)]);
    assert_eq!(config.resolve_organization(), "octokit");
}

#[rstest]
fn jira_host_is_derived_from_base_url() {
    let config = SwitchyardConfig {
        jira_base_url: Some("https://acme.atlassian.net/".to_owned()),
        ..SwitchyardConfig::default()
    };

    assert_eq!(
        config.resolve_jira_host().ok().as_deref(),
        Some("acme.atlassian.net")
    );
}

#[rstest]
fn require_names_the_missing_field() {
    let error = SwitchyardConfig::require("slack_token", Some("  "))
        .expect_err("blank value should be rejected");

    assert_eq!(
        error.to_string(),
        "configuration error: slack_token is required (use --slack-token or SWITCHYARD_SLACK_TOKEN)"
    );
}

#[rstest]
fn settings_reads_template_override_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
    write!(file, "## {{{{ summary }}}}").expect("template should be written");
    let _guard = env_lock::lock_env([("GITHUB_REPOSITORY_OWNER", None::<&str>)]);

    let config = SwitchyardConfig {
        organization: Some("acme".to_owned()),
        jira_host: Some("acme.atlassian.net".to_owned()),
        quiet_checks: "Lint".to_owned(),
        pull_request_template: Some(file.path().to_string_lossy().into_owned()),
        ..SwitchyardConfig::default()
    };
    let settings = config.settings().expect("settings should build");

    assert_eq!(settings.organization, "acme");
    assert_eq!(settings.quiet_checks, vec!["Lint".to_owned()]);
    assert_eq!(settings.pull_request_template, "## {{ summary }}");
    assert_eq!(settings.develop_branch, "develop");
}

#[rstest]
fn settings_reports_unreadable_template() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let config = SwitchyardConfig {
        jira_host: Some("acme.atlassian.net".to_owned()),
        pull_request_template: Some(
            temp_dir
                .path()
                .join("missing.md")
                .to_string_lossy()
                .into_owned(),
        ),
        ..SwitchyardConfig::default()
    };

    assert!(matches!(
        config.settings(),
        Err(AutomationError::Io { .. })
    ));
}

#[rstest]
fn loads_from_environment_and_cli() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();
    let _guard = env_lock::lock_env([
        ("SWITCHYARD_GITHUB_WRITE_USER", Some("env-bot")),
        ("SWITCHYARD_EVENT_NAME", Some("pull_request")),
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
    ]);

    let args: Vec<std::ffi::OsString> = ["switchyard", "--event-name", "check_suite"]
        .iter()
        .map(std::ffi::OsString::from)
        .collect();
    let config = SwitchyardConfig::load_from_iter(args).expect("config should load");

    assert_eq!(config.github_write_user, "env-bot");
    assert_eq!(config.event_name.as_deref(), Some("check_suite"));
}
