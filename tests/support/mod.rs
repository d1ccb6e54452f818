//! Shared test utilities: webhook payload builders.

use serde_json::{Value, json};
use switchyard::github::models::PullRequestView;

/// Organisation used by every scenario.
pub const OWNER: &str = "octokit";

/// Builds a `pull_request` webhook payload for `action`.
pub fn pull_request_payload(action: &str, repository: &str, pull: &PullRequestView) -> Value {
    json!({
        "action": action,
        "repository": repository_json(repository),
        "pull_request": {
            "number": pull.number,
            "title": pull.title,
            "body": pull.body,
            "html_url": pull.html_url,
            "merged": pull.merged,
            "head": { "ref": pull.head_ref },
            "base": { "ref": pull.base_ref },
            "labels": pull.labels.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
            "user": { "login": pull.author },
        },
    })
}

/// Builds a completed `check_suite` payload for `after` (when known),
/// attached to pull request `number`.
pub fn check_suite_payload(
    repository: &str,
    check_name: &str,
    conclusion: &str,
    after: Option<&str>,
    number: u64,
) -> Value {
    json!({
        "action": "completed",
        "repository": repository_json(repository),
        "check_suite": {
            "conclusion": conclusion,
            "after": after,
            "head_sha": null,
            "app": { "name": check_name },
            "pull_requests": [{ "number": number }],
        },
    })
}

/// Builds a `workflow_dispatch` payload for a manual trigger.
pub fn dispatch_payload(event: &str, email: &str, param: &str) -> Value {
    json!({
        "inputs": { "event": event, "email": email, "param": param },
    })
}

fn repository_json(name: &str) -> Value {
    json!({ "name": name, "owner": { "login": OWNER } })
}
