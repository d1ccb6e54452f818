//! Switchyard entrypoint: handles one webhook event and exits.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use serde_json::Value;
use tracing::{error, info};

use switchyard::credentials::HttpCredentialResolver;
use switchyard::github::{OctocrabHostingGateway, PersonalAccessToken};
use switchyard::jira::{JiraConfig, JiraGateway};
use switchyard::slack::SlackGateway;
use switchyard::{AutomationError, Collaborators, HandlerContext, SwitchyardConfig, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return report_early(&error),
    };
    if let Err(error) = logging::init(config.log_json) {
        return report_early(&error);
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(error = %failure, "automation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &SwitchyardConfig) -> Result<(), AutomationError> {
    let event_name = config.resolve_event_name()?;
    let payload = read_payload(&config.resolve_event_path()?)?;
    let event = switchyard::route(&event_name, &payload)?;

    let settings = config.settings()?;
    let token = PersonalAccessToken::new(config.resolve_github_token()?)?;
    let hosting = OctocrabHostingGateway::for_token(&token, &config.github_api_url)?;
    let tracker = JiraGateway::new(JiraConfig::new(
        SwitchyardConfig::require("jira_base_url", config.jira_base_url.as_deref())?,
        SwitchyardConfig::require("jira_email", config.jira_email.as_deref())?,
        SwitchyardConfig::require("jira_token", config.jira_token.as_deref())?,
        config.jira_repository_field.as_str(),
    ))?;
    let chat = SlackGateway::new(
        config.slack_api_url.as_str(),
        SwitchyardConfig::require("slack_token", config.slack_token.as_deref())?,
    )?;
    let credentials = HttpCredentialResolver::new(
        SwitchyardConfig::require(
            "credentials_api_prefix",
            config.credentials_api_prefix.as_deref(),
        )?,
        SwitchyardConfig::require(
            "credentials_api_secret",
            config.credentials_api_secret.as_deref(),
        )?,
    )?;

    let context = HandlerContext::new(
        &settings,
        Collaborators {
            hosting: &hosting,
            git_data: &hosting,
            tracker: &tracker,
            chat: &chat,
            credentials: &credentials,
        },
    );
    let effects = switchyard::dispatch(&context, event).await?;
    info!(event_name = event_name.as_str(), effects = effects.len(), "event handled");
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`AutomationError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<SwitchyardConfig, AutomationError> {
    SwitchyardConfig::load().map_err(|error| AutomationError::Configuration {
        message: error.to_string(),
    })
}

fn read_payload(path: &str) -> Result<Value, AutomationError> {
    let raw = fs::read_to_string(path).map_err(|error| AutomationError::Io {
        message: format!("failed to read event payload {path}: {error}"),
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        AutomationError::invalid_payload(format!("event payload is not JSON: {error}"))
    })
}

fn report_early(error: &AutomationError) -> ExitCode {
    // Logging is not installed yet.
    let _ignored = writeln!(io::stderr().lock(), "{error}");
    ExitCode::FAILURE
}
