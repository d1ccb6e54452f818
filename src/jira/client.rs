//! Jira REST implementation of the tracker gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::AutomationError;

use super::{IssueAssignee, IssueView, TrackerGateway};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for [`JiraGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraConfig {
    /// Base URL, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    /// Account email used for basic authentication.
    pub email: String,
    /// API token used for basic authentication.
    pub token: String,
    /// Custom field holding the repository name.
    pub repository_field: String,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl JiraConfig {
    /// Constructs configuration with the default timeout.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
        repository_field: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            token: token.into(),
            repository_field: repository_field.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Tracker gateway backed by the Jira REST API.
#[derive(Debug, Clone)]
pub struct JiraGateway {
    config: JiraConfig,
    client: Client,
}

impl JiraGateway {
    /// Creates a gateway from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError::Configuration` when the HTTP client cannot
    /// be built.
    pub fn new(config: JiraConfig) -> Result<Self, AutomationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| AutomationError::Configuration {
                message: format!("failed to configure Jira HTTP client: {error}"),
            })?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.config.email, Some(&self.config.token))
    }

    async fn send(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> Result<Response, AutomationError> {
        self.authorised(builder)
            .send()
            .await
            .map_err(|error| AutomationError::Network {
                message: format!("{operation} failed: {error}"),
            })
    }

    fn issue_from(&self, issue: ApiIssue) -> IssueView {
        let fields = issue.fields;
        let repository = fields
            .extra
            .get(&self.config.repository_field)
            .and_then(repository_value);
        IssueView {
            id: issue.id,
            key: issue.key,
            summary: fields.summary.unwrap_or_default(),
            description: fields.description,
            status: fields.status.map(|status| status.name).unwrap_or_default(),
            issue_type: fields.issuetype.map(|kind| kind.name).unwrap_or_default(),
            assignee: fields.assignee.map(|assignee| IssueAssignee {
                email: assignee.email_address,
                display_name: assignee.display_name,
            }),
            subtasks: fields.subtasks.into_iter().map(|task| task.key).collect(),
            repository,
        }
    }
}

#[async_trait]
impl TrackerGateway for JiraGateway {
    async fn issue(&self, key: &str) -> Result<Option<IssueView>, AutomationError> {
        let request = self.client.get(self.endpoint(&format!("/rest/api/2/issue/{key}")));
        let response = self.send("fetch issue", request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let issue: ApiIssue = decode("fetch issue", response).await?;
        Ok(Some(self.issue_from(issue)))
    }

    async fn set_issue_status(
        &self,
        issue_id: &str,
        status: &str,
    ) -> Result<(), AutomationError> {
        let path = format!("/rest/api/2/issue/{issue_id}/transitions");
        let response = self
            .send("list transitions", self.client.get(self.endpoint(&path)))
            .await?;
        let available: ApiTransitions = decode("list transitions", response).await?;

        let transition = available
            .transitions
            .into_iter()
            .find(|transition| transition.to.name.eq_ignore_ascii_case(status))
            .ok_or_else(|| {
                AutomationError::api(format!(
                    "issue {issue_id} has no transition to status '{status}'"
                ))
            })?;
        debug!(issue_id, status, transition = %transition.id, "transitioning issue");

        let body = json!({ "transition": { "id": transition.id } });
        let response = self
            .send(
                "transition issue",
                self.client.post(self.endpoint(&path)).json(&body),
            )
            .await?;
        ensure_success("transition issue", response).await
    }

    async fn linked_pull_request_numbers(
        &self,
        issue_id: &str,
    ) -> Result<Vec<u64>, AutomationError> {
        let request = self
            .client
            .get(self.endpoint("/rest/dev-status/latest/issue/detail"))
            .query(&[
                ("issueId", issue_id),
                ("applicationType", "GitHub"),
                ("dataType", "pullrequest"),
            ]);
        let response = self.send("list linked pull requests", request).await?;
        let status: ApiDevStatus = decode("list linked pull requests", response).await?;

        Ok(status
            .detail
            .into_iter()
            .flat_map(|detail| detail.pull_requests)
            .filter(|pull| pull.status.eq_ignore_ascii_case("OPEN"))
            .filter_map(|pull| pull.id.trim_start_matches('#').parse().ok())
            .collect())
    }
}

async fn ensure_success(operation: &str, response: Response) -> Result<(), AutomationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "(failed to read error response body)".to_owned());
    Err(status_error(operation, status, &body))
}

async fn decode<T>(operation: &str, response: Response) -> Result<T, AutomationError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(operation, status, &body));
    }
    response.json().await.map_err(|error| AutomationError::Api {
        message: format!("{operation} response JSON decoding failed: {error}"),
    })
}

fn status_error(operation: &str, status: StatusCode, body: &str) -> AutomationError {
    let message = format!("{operation} failed with status {}: {body}", status.as_u16());
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        AutomationError::Authentication { message }
    } else {
        AutomationError::Api { message }
    }
}

/// Repository custom fields are either plain strings or select options.
fn repository_value(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(name) => Some(name.as_str()),
        Value::Object(option) => option.get("value").and_then(Value::as_str),
        _ => None,
    }?;
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    id: String,
    key: String,
    fields: ApiIssueFields,
}

#[derive(Debug, Deserialize)]
struct ApiIssueFields {
    summary: Option<String>,
    description: Option<String>,
    status: Option<ApiNamed>,
    issuetype: Option<ApiNamed>,
    assignee: Option<ApiAssignee>,
    #[serde(default)]
    subtasks: Vec<ApiSubtask>,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAssignee {
    email_address: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSubtask {
    key: String,
}

#[derive(Debug, Deserialize)]
struct ApiTransitions {
    transitions: Vec<ApiTransition>,
}

#[derive(Debug, Deserialize)]
struct ApiTransition {
    id: String,
    to: ApiNamed,
}

#[derive(Debug, Deserialize)]
struct ApiDevStatus {
    #[serde(default)]
    detail: Vec<ApiDevStatusDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDevStatusDetail {
    #[serde(default)]
    pull_requests: Vec<ApiLinkedPullRequest>,
}

#[derive(Debug, Deserialize)]
struct ApiLinkedPullRequest {
    id: String,
    status: String,
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
