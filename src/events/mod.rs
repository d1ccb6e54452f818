//! Event values and the router that classifies raw webhook payloads.
//!
//! Routing only identifies the kind of event and extracts the fields the
//! handlers need. It carries no business rules.

mod payload;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::AutomationError;
use crate::github::locator::RepositoryRef;
use crate::github::models::PullRequestView;

use payload::{ActionOnly, CheckSuitePayload, DispatchPayload, PullRequestPayload};

/// A completed check suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSuiteEvent {
    /// Repository the suite ran in.
    pub repository: RepositoryRef,
    /// Name of the app that ran the suite.
    pub check_name: String,
    /// Conclusion such as `success` or `failure`.
    pub conclusion: Option<String>,
    /// Head commit the suite ran against.
    pub head_sha: Option<String>,
    /// Pull requests the suite is attached to.
    pub pull_request_numbers: Vec<u64>,
}

/// A pull request event with the pull request as delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// Repository of the pull request.
    pub repository: RepositoryRef,
    /// The pull request.
    pub pull_request: PullRequestView,
}

/// A manually dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualTrigger {
    /// Create a branch and draft pull request for a tracker issue.
    CreatePullRequestForIssue {
        /// Email of the person who asked.
        email: String,
        /// Issue key to create the pull request for.
        issue_key: String,
    },
    /// Create or refresh the release candidate pull request.
    CreateReleasePullRequest {
        /// Email of the person who asked.
        email: String,
        /// Repository name within the organisation.
        repository: String,
    },
}

/// Every kind of event the automation reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationEvent {
    /// A check suite completed.
    CheckSuiteCompleted(CheckSuiteEvent),
    /// A pull request was closed, merged or not.
    PullRequestClosed(PullRequestEvent),
    /// A draft pull request was marked ready for review.
    PullRequestReadyForReview(PullRequestEvent),
    /// A pull request was updated and may need rebasing.
    EpicRebase(PullRequestEvent),
    /// A manual trigger.
    Manual(ManualTrigger),
    /// Nothing to do for this event.
    Ignored {
        /// Webhook event name.
        event_name: String,
        /// Payload action, if any.
        action: Option<String>,
    },
}

/// Classify a webhook payload.
///
/// # Errors
///
/// Returns `AutomationError::InvalidPayload` when a recognised event lacks
/// the fields its handler needs, or when a manual trigger names an unknown
/// event.
pub fn route(event_name: &str, payload: &Value) -> Result<AutomationEvent, AutomationError> {
    let action = parse::<ActionOnly>(event_name, payload)?.action;
    debug!(event_name, action = action.as_deref(), "routing event");

    let event = match (event_name, action.as_deref()) {
        ("check_suite", Some("completed")) => {
            let suite = parse::<CheckSuitePayload>(event_name, payload)?;
            AutomationEvent::CheckSuiteCompleted(suite.try_into()?)
        }
        ("pull_request", Some("closed")) => {
            AutomationEvent::PullRequestClosed(pull_request(event_name, payload)?)
        }
        ("pull_request", Some("ready_for_review")) => {
            AutomationEvent::PullRequestReadyForReview(pull_request(event_name, payload)?)
        }
        ("pull_request", Some("synchronize")) => {
            AutomationEvent::EpicRebase(pull_request(event_name, payload)?)
        }
        ("workflow_dispatch" | "repository_dispatch", _) => {
            AutomationEvent::Manual(parse::<DispatchPayload>(event_name, payload)?.try_into()?)
        }
        _ => AutomationEvent::Ignored {
            event_name: event_name.to_owned(),
            action,
        },
    };
    Ok(event)
}

fn pull_request(event_name: &str, payload: &Value) -> Result<PullRequestEvent, AutomationError> {
    parse::<PullRequestPayload>(event_name, payload)?.try_into()
}

fn parse<T: DeserializeOwned>(event_name: &str, payload: &Value) -> Result<T, AutomationError> {
    T::deserialize(payload).map_err(|error| {
        AutomationError::invalid_payload(format!("{event_name} payload: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{AutomationEvent, ManualTrigger, route};
    use crate::error::AutomationError;

    fn repository() -> Value {
        json!({ "name": "actions", "owner": { "login": "octokit" } })
    }

    fn pull_request_payload(action: &str) -> Value {
        json!({
            "action": action,
            "repository": repository(),
            "pull_request": {
                "number": 7,
                "title": "[STUDIO-1] Widget",
                "body": "Body",
                "html_url": "https://github.com/octokit/actions/pull/7",
                "merged": true,
                "head": { "ref": "dave/studio-1-widget" },
                "base": { "ref": "develop" }
            }
        })
    }

    #[test]
    fn check_suite_completed_extracts_suite_fields() {
        let payload = json!({
            "action": "completed",
            "repository": repository(),
            "check_suite": {
                "conclusion": "failure",
                "after": "abc123",
                "app": { "name": "CircleCI" },
                "pull_requests": [{ "number": 3 }]
            }
        });

        let AutomationEvent::CheckSuiteCompleted(event) =
            route("check_suite", &payload).expect("payload should route")
        else {
            panic!("expected a check suite event");
        };
        assert_eq!(event.repository.to_string(), "octokit/actions");
        assert_eq!(event.check_name, "CircleCI");
        assert_eq!(event.conclusion.as_deref(), Some("failure"));
        assert_eq!(event.head_sha.as_deref(), Some("abc123"));
        assert_eq!(event.pull_request_numbers, vec![3]);
    }

    #[rstest]
    #[case::closed("closed")]
    #[case::ready("ready_for_review")]
    #[case::synchronize("synchronize")]
    fn pull_request_actions_route_to_their_kind(#[case] action: &str) {
        let event = route("pull_request", &pull_request_payload(action)).expect("should route");
        let matched = match (&event, action) {
            (AutomationEvent::PullRequestClosed(pull), "closed")
            | (AutomationEvent::PullRequestReadyForReview(pull), "ready_for_review")
            | (AutomationEvent::EpicRebase(pull), "synchronize") => {
                pull.pull_request.head_ref == "dave/studio-1-widget"
            }
            _ => false,
        };
        assert!(matched, "unexpected routing for {action}: {event:?}");
    }

    #[rstest]
    #[case::opened("pull_request", json!({ "action": "opened" }))]
    #[case::push("push", json!({ "ref": "refs/heads/develop" }))]
    #[case::suite_requested("check_suite", json!({ "action": "requested" }))]
    fn other_events_are_ignored(#[case] event_name: &str, #[case] payload: Value) {
        let event = route(event_name, &payload).expect("should route");
        assert!(
            matches!(event, AutomationEvent::Ignored { .. }),
            "expected Ignored, got {event:?}"
        );
    }

    #[test]
    fn workflow_dispatch_creates_issue_pull_request_trigger() {
        let payload = json!({
            "inputs": {
                "event": "createPullRequestForJiraIssue",
                "email": "dave@example.com",
                "param": "STUDIO-42"
            }
        });

        let event = route("workflow_dispatch", &payload).expect("should route");
        assert_eq!(
            event,
            AutomationEvent::Manual(ManualTrigger::CreatePullRequestForIssue {
                email: "dave@example.com".to_owned(),
                issue_key: "STUDIO-42".to_owned(),
            })
        );
    }

    #[test]
    fn repository_dispatch_creates_release_trigger() {
        let payload = json!({
            "action": "automation",
            "client_payload": {
                "event": "createReleasePullRequest",
                "email": "dave@example.com",
                "param": "actions"
            }
        });

        let event = route("repository_dispatch", &payload).expect("should route");
        assert!(matches!(
            event,
            AutomationEvent::Manual(ManualTrigger::CreateReleasePullRequest { .. })
        ));
    }

    #[test]
    fn unknown_manual_event_is_invalid() {
        let payload = json!({
            "inputs": { "event": "deleteEverything", "email": "a@b.c", "param": "x" }
        });
        let result = route("workflow_dispatch", &payload);
        assert!(
            matches!(result, Err(AutomationError::InvalidPayload { .. })),
            "expected InvalidPayload, got {result:?}"
        );
    }

    #[test]
    fn malformed_pull_request_payload_is_invalid() {
        let payload = json!({ "action": "closed", "repository": repository() });
        let result = route("pull_request", &payload);
        assert!(
            matches!(result, Err(AutomationError::InvalidPayload { .. })),
            "expected InvalidPayload, got {result:?}"
        );
    }
}
