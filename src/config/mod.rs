//! Runtime configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Values are merged with the following precedence (lowest to highest):
//!
//! 1. **Defaults** – built-in values matching the production deployment
//! 2. **Configuration file** – `.switchyard.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `SWITCHYARD_*`, plus the legacy Actions
//!    variables `GITHUB_EVENT_NAME`, `GITHUB_EVENT_PATH`, `GITHUB_TOKEN` and
//!    `GITHUB_REPOSITORY_OWNER`
//! 4. **Command-line arguments** – `--event-name`/`-e`, `--event-path`/`-p`,
//!    `--github-token`/`-t` and friends
//!
//! # Configuration File
//!
//! ```toml
//! organization = "octokit"
//! github_write_user = "sr-devops"
//! quiet_checks = "GitGuardian, Codecov"
//! jira_base_url = "https://example.atlassian.net"
//! jira_email = "bot@example.com"
//! jira_repository_field = "customfield_10060"
//! credentials_api_prefix = "https://hub.example.com/api/private/credentials/"
//! ```

use std::env;
use std::fs;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AutomationError;
use crate::github::DEFAULT_API_BASE;
use crate::settings::AutomationSettings;
use crate::slack::DEFAULT_SLACK_API_URL;

const DEFAULT_ORGANIZATION: &str = "octokit";
const DEFAULT_WRITE_USER: &str = "sr-devops";
const DEFAULT_QUIET_CHECKS: &str = "GitGuardian,Codecov";
const DEFAULT_JIRA_REPOSITORY_FIELD: &str = "customfield_10060";

/// Configuration for one automation run.
///
/// Every value can be provided via:
/// - CLI: `--<field-name>` (hyphenated)
/// - Environment: `SWITCHYARD_<FIELD_NAME>`
/// - Config file: `<field_name> = "..."`
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "SWITCHYARD",
    discovery(
        dotfile_name = ".switchyard.toml",
        config_file_name = "switchyard.toml",
        app_name = "switchyard"
    )
)]
pub struct SwitchyardConfig {
    /// Name of the webhook event being handled, for example `check_suite`.
    ///
    /// Falls back to `GITHUB_EVENT_NAME`.
    #[ortho_config(cli_short = 'e')]
    pub event_name: Option<String>,

    /// Path of the JSON file holding the event payload.
    ///
    /// Falls back to `GITHUB_EVENT_PATH`.
    #[ortho_config(cli_short = 'p')]
    pub event_path: Option<String>,

    /// Token used for hosting API calls made as the automation identity.
    ///
    /// Falls back to `GITHUB_TOKEN`.
    #[ortho_config(cli_short = 't')]
    pub github_token: Option<String>,

    /// Base URL of the hosting REST API.
    pub github_api_url: String,

    /// Organisation owning the repositories handled by manual triggers.
    ///
    /// Falls back to `GITHUB_REPOSITORY_OWNER` when left unset.
    pub organization: Option<String>,

    /// Hosting username the automation writes as.
    pub github_write_user: String,

    /// Comma-separated check names that never notify on success.
    pub quiet_checks: String,

    /// Host name used for issue links. Derived from `jira_base_url` when unset.
    pub jira_host: Option<String>,

    /// Base URL of the tracker REST API.
    pub jira_base_url: Option<String>,

    /// Account email used for tracker basic authentication.
    pub jira_email: Option<String>,

    /// API token used for tracker basic authentication.
    pub jira_token: Option<String>,

    /// Custom field naming the repository an issue belongs to.
    pub jira_repository_field: String,

    /// Bot token for the chat API.
    pub slack_token: Option<String>,

    /// Base URL of the chat API.
    pub slack_api_url: String,

    /// URL prefix of the credential lookup service.
    pub credentials_api_prefix: Option<String>,

    /// Shared secret signing credential lookups.
    pub credentials_api_secret: Option<String>,

    /// Path of a Jinja template overriding the issue pull request body.
    pub pull_request_template: Option<String>,

    /// Emits logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for SwitchyardConfig {
    fn default() -> Self {
        Self {
            event_name: None,
            event_path: None,
            github_token: None,
            github_api_url: DEFAULT_API_BASE.to_owned(),
            organization: None,
            github_write_user: DEFAULT_WRITE_USER.to_owned(),
            quiet_checks: DEFAULT_QUIET_CHECKS.to_owned(),
            jira_host: None,
            jira_base_url: None,
            jira_email: None,
            jira_token: None,
            jira_repository_field: DEFAULT_JIRA_REPOSITORY_FIELD.to_owned(),
            slack_token: None,
            slack_api_url: DEFAULT_SLACK_API_URL.to_owned(),
            credentials_api_prefix: None,
            credentials_api_secret: None,
            pull_request_template: None,
            log_json: false,
        }
    }
}

impl SwitchyardConfig {
    /// Resolves the event name, falling back to `GITHUB_EVENT_NAME`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Configuration`] when neither source is set.
    pub fn resolve_event_name(&self) -> Result<String, AutomationError> {
        with_fallback(self.event_name.as_deref(), "GITHUB_EVENT_NAME").ok_or_else(|| {
            missing("event name is required (use --event-name or GITHUB_EVENT_NAME)")
        })
    }

    /// Resolves the payload path, falling back to `GITHUB_EVENT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Configuration`] when neither source is set.
    pub fn resolve_event_path(&self) -> Result<String, AutomationError> {
        with_fallback(self.event_path.as_deref(), "GITHUB_EVENT_PATH").ok_or_else(|| {
            missing("event payload path is required (use --event-path or GITHUB_EVENT_PATH)")
        })
    }

    /// Resolves the hosting token, falling back to `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Configuration`] when neither source is set.
    pub fn resolve_github_token(&self) -> Result<String, AutomationError> {
        with_fallback(self.github_token.as_deref(), "GITHUB_TOKEN").ok_or_else(|| {
            missing("hosting token is required (use --github-token or GITHUB_TOKEN)")
        })
    }

    /// Returns the organisation, falling back to `GITHUB_REPOSITORY_OWNER` and
    /// then the built-in default.
    #[must_use]
    pub fn resolve_organization(&self) -> String {
        with_fallback(self.organization.as_deref(), "GITHUB_REPOSITORY_OWNER")
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_owned())
    }

    /// Splits `quiet_checks` on commas, dropping blank entries.
    #[must_use]
    pub fn quiet_check_names(&self) -> Vec<String> {
        self.quiet_checks
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Host name used in issue links.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Configuration`] when neither `jira_host`
    /// nor a parseable `jira_base_url` is available.
    pub fn resolve_jira_host(&self) -> Result<String, AutomationError> {
        if let Some(host) = non_blank(self.jira_host.as_deref()) {
            return Ok(host.to_owned());
        }
        let base = Self::require("jira_base_url", self.jira_base_url.as_deref())?;
        Url::parse(base)
            .ok()
            .and_then(|url| url.host_str().map(ToOwned::to_owned))
            .ok_or_else(|| AutomationError::Configuration {
                message: format!("jira_base_url is not a valid URL: {base}"),
            })
    }

    /// Returns a required optional field or a configuration error naming it.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Configuration`] when `value` is missing or
    /// blank.
    pub fn require<'a>(
        field: &str,
        value: Option<&'a str>,
    ) -> Result<&'a str, AutomationError> {
        non_blank(value).ok_or_else(|| AutomationError::Configuration {
            message: format!(
                "{field} is required (use --{} or SWITCHYARD_{})",
                field.replace('_', "-"),
                field.to_uppercase()
            ),
        })
    }

    /// Builds the settings value handed to every handler.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Io`] when the configured template cannot be
    /// read, or [`AutomationError::Configuration`] when the tracker host
    /// cannot be determined.
    pub fn settings(&self) -> Result<AutomationSettings, AutomationError> {
        let defaults = AutomationSettings::default();
        let pull_request_template = match non_blank(self.pull_request_template.as_deref()) {
            Some(path) => fs::read_to_string(path).map_err(|error| AutomationError::Io {
                message: format!("failed to read pull request template {path}: {error}"),
            })?,
            None => defaults.pull_request_template,
        };

        Ok(AutomationSettings {
            organization: self.resolve_organization(),
            github_write_user: self.github_write_user.clone(),
            quiet_checks: self.quiet_check_names(),
            jira_host: self.resolve_jira_host()?,
            pull_request_template,
            ..defaults
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn with_fallback(value: Option<&str>, variable: &str) -> Option<String> {
    non_blank(value).map(ToOwned::to_owned).or_else(|| {
        env::var(variable)
            .ok()
            .filter(|text| !text.trim().is_empty())
    })
}

fn missing(message: &str) -> AutomationError {
    AutomationError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
