//! Reacts to a pull request leaving draft: asks for review and moves the
//! issue into technical review.

use tracing::info;

use crate::error::AutomationError;
use crate::events::PullRequestEvent;
use crate::jira::IssueView;
use crate::rules::extract_issue_key;
use crate::settings::AutomationSettings;

use super::{Effect, EffectExecutor, HandlerContext, found};

/// Handle a pull request marked ready for review.
///
/// # Errors
///
/// Propagates failures to label the pull request or transition the issue.
pub async fn handle(
    context: &HandlerContext<'_>,
    event: &PullRequestEvent,
) -> Result<Vec<Effect>, AutomationError> {
    let pull = &event.pull_request;
    let repository = &event.repository;

    let Some(key) = extract_issue_key(&pull.title, pull.body.as_deref()) else {
        info!(%repository, number = pull.number, "no issue key in the pull request - ignoring");
        return Ok(Vec::new());
    };
    let tracker = context.collaborators.tracker;
    let Some(issue) = found("issue", tracker.issue(key.as_str()).await) else {
        info!(%repository, number = pull.number, issue = %key, "no issue found - ignoring");
        return Ok(Vec::new());
    };

    EffectExecutor::new(context)
        .run(decide(context.settings, event, &issue))
        .await
}

/// Decide the effects for a pull request that is ready for review.
#[must_use]
pub fn decide(
    settings: &AutomationSettings,
    event: &PullRequestEvent,
    issue: &IssueView,
) -> Vec<Effect> {
    let mut effects = vec![Effect::AddLabels {
        repository: event.repository.clone(),
        number: event.pull_request.number,
        labels: vec![settings.labels.please_review.clone()],
    }];

    let tech_review = &settings.statuses.tech_review;
    if &issue.status == tech_review {
        info!(issue = %issue.key, status = %tech_review, "issue is already in review - ignoring");
    } else {
        effects.push(Effect::SetIssueStatus {
            issue_id: issue.id.clone(),
            status: tech_review.clone(),
        });
    }
    effects
}
