//! Raw webhook payload shapes and their conversion into event values.

use serde::Deserialize;

use crate::error::AutomationError;
use crate::github::locator::RepositoryRef;
use crate::github::models::{ApiPullRequest, PullRequestView};

use super::{CheckSuiteEvent, ManualTrigger, PullRequestEvent};

const CREATE_ISSUE_PULL_REQUEST: &str = "createPullRequestForJiraIssue";
const CREATE_RELEASE_PULL_REQUEST: &str = "createReleasePullRequest";

#[derive(Debug, Deserialize)]
pub(super) struct ActionOnly {
    pub(super) action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiRepositoryPayload {
    name: String,
    owner: ApiOwner,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl ApiRepositoryPayload {
    fn into_ref(self) -> Result<RepositoryRef, AutomationError> {
        RepositoryRef::new(&self.owner.login, &self.name)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckSuitePayload {
    check_suite: ApiCheckSuite,
    repository: ApiRepositoryPayload,
}

#[derive(Debug, Deserialize)]
struct ApiCheckSuite {
    conclusion: Option<String>,
    after: Option<String>,
    head_sha: Option<String>,
    app: Option<ApiApp>,
    #[serde(default)]
    pull_requests: Vec<ApiSuitePullRequest>,
}

#[derive(Debug, Deserialize)]
struct ApiApp {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiSuitePullRequest {
    number: u64,
}

impl TryFrom<CheckSuitePayload> for CheckSuiteEvent {
    type Error = AutomationError;

    fn try_from(value: CheckSuitePayload) -> Result<Self, Self::Error> {
        let suite = value.check_suite;
        Ok(Self {
            repository: value.repository.into_ref()?,
            check_name: suite.app.map(|app| app.name).unwrap_or_default(),
            conclusion: suite.conclusion,
            head_sha: suite
                .after
                .or(suite.head_sha)
                .filter(|sha| !sha.trim().is_empty()),
            pull_request_numbers: suite
                .pull_requests
                .into_iter()
                .map(|pull| pull.number)
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PullRequestPayload {
    pull_request: ApiPullRequest,
    repository: ApiRepositoryPayload,
}

impl TryFrom<PullRequestPayload> for PullRequestEvent {
    type Error = AutomationError;

    fn try_from(value: PullRequestPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            repository: value.repository.into_ref()?,
            pull_request: PullRequestView::from(value.pull_request),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DispatchPayload {
    inputs: Option<TriggerInputs>,
    client_payload: Option<TriggerInputs>,
}

#[derive(Debug, Deserialize)]
struct TriggerInputs {
    event: String,
    email: String,
    #[serde(default)]
    param: String,
}

impl TryFrom<DispatchPayload> for ManualTrigger {
    type Error = AutomationError;

    fn try_from(value: DispatchPayload) -> Result<Self, Self::Error> {
        let inputs = value
            .inputs
            .or(value.client_payload)
            .ok_or_else(|| AutomationError::invalid_payload("manual trigger has no inputs"))?;
        let param = inputs.param.trim().to_owned();
        if param.is_empty() {
            return Err(AutomationError::invalid_payload(format!(
                "manual trigger '{}' requires a parameter",
                inputs.event
            )));
        }

        match inputs.event.as_str() {
            CREATE_ISSUE_PULL_REQUEST => Ok(Self::CreatePullRequestForIssue {
                email: inputs.email,
                issue_key: param,
            }),
            CREATE_RELEASE_PULL_REQUEST => Ok(Self::CreateReleasePullRequest {
                email: inputs.email,
                repository: param,
            }),
            other => Err(AutomationError::invalid_payload(format!(
                "unknown manual trigger event '{other}'"
            ))),
        }
    }
}
