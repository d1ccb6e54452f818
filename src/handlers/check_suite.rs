//! Reacts to a completed check suite by labelling the pull request and
//! telling the issue assignee how their checks went.

use tracing::{error, info};

use crate::error::AutomationError;
use crate::events::CheckSuiteEvent;
use crate::github::models::PullRequestView;
use crate::jira::IssueView;
use crate::rules::{extract_issue_key, extract_pull_request_number};
use crate::settings::AutomationSettings;

use super::{Effect, EffectExecutor, HandlerContext, found};

const POSITIVE_EMOJI: [&str; 7] = [
    ":tada:",
    ":rocket:",
    ":muscle:",
    ":raised_hands:",
    ":star2:",
    ":sunglasses:",
    ":white_check_mark:",
];

/// Handle a completed check suite.
///
/// # Errors
///
/// Propagates a failure to add the failure label.
pub async fn handle(
    context: &HandlerContext<'_>,
    suite: &CheckSuiteEvent,
) -> Result<Vec<Effect>, AutomationError> {
    let hosting = context.collaborators.hosting;
    let repository = &suite.repository;

    let Some(number) = resolve_pull_request_number(context, suite).await else {
        return Ok(Vec::new());
    };

    let Some(pull) = found("pull request", hosting.pull_request(repository, number).await) else {
        error!(%repository, number, "could not fetch the pull request");
        return Ok(Vec::new());
    };

    let Some(key) = extract_issue_key(&pull.title, pull.body.as_deref()) else {
        info!(%repository, number, "no issue key in the pull request - ignoring");
        return Ok(Vec::new());
    };

    let tracker = context.collaborators.tracker;
    let Some(issue) = found("issue", tracker.issue(key.as_str()).await) else {
        info!(%repository, number, issue = %key, "no issue found - ignoring");
        return Ok(Vec::new());
    };

    let effects = decide(context.settings, suite, &pull, &issue);
    EffectExecutor::new(context).run(effects).await
}

async fn resolve_pull_request_number(
    context: &HandlerContext<'_>,
    suite: &CheckSuiteEvent,
) -> Option<u64> {
    let repository = &suite.repository;
    if suite.head_sha.is_none() && suite.pull_request_numbers.is_empty() {
        error!(%repository, "no commit or pull request associated with this check - giving up");
        return None;
    }

    let mut from_commit = None;
    if let Some(sha) = suite.head_sha.as_deref() {
        let hosting = context.collaborators.hosting;
        let Some(commit) = found("commit", hosting.commit(repository, sha).await) else {
            error!(%repository, sha, "couldn't find commit - giving up");
            return None;
        };
        from_commit = extract_pull_request_number(&commit.message);
    }

    let number = from_commit.or_else(|| suite.pull_request_numbers.first().copied());
    if number.is_none() {
        info!(%repository, "no pull request associated with this check suite - ignoring");
    }
    number
}

/// Decide the effects of a completed suite for a pull request and issue.
#[must_use]
pub fn decide(
    settings: &AutomationSettings,
    suite: &CheckSuiteEvent,
    pull: &PullRequestView,
    issue: &IssueView,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let message = match suite.conclusion.as_deref() {
        Some("failure") => {
            effects.push(Effect::AddLabels {
                repository: suite.repository.clone(),
                number: pull.number,
                labels: vec![settings.labels.has_issues.clone()],
            });
            Some(failure_message(&suite.check_name, pull))
        }
        Some("success") if !settings.is_quiet_check(&suite.check_name) => {
            Some(success_message(&suite.check_name, pull))
        }
        _ => None,
    };

    let lookup = issue
        .assignee
        .as_ref()
        .and_then(|assignee| assignee.credentials_lookup());
    if let (Some(lookup), Some(message)) = (lookup, message) {
        effects.push(Effect::NotifyAssignee {
            lookup: lookup.to_owned(),
            message,
        });
    }
    effects
}

fn failure_message(check_name: &str, pull: &PullRequestView) -> String {
    format!(
        "Check suite _*{check_name}*_ failed for *<{}|{}>*",
        pull.html_url, pull.title
    )
}

fn success_message(check_name: &str, pull: &PullRequestView) -> String {
    format!(
        "Check suite _*{check_name}*_ passed for *<{}|{}>* {}",
        pull.html_url,
        pull.title,
        positive_emoji(pull.number)
    )
}

fn positive_emoji(seed: u64) -> &'static str {
    let index = usize::try_from(seed)
        .unwrap_or_default()
        .checked_rem(POSITIVE_EMOJI.len())
        .unwrap_or_default();
    POSITIVE_EMOJI.get(index).copied().unwrap_or(":tada:")
}
