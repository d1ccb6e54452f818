//! Reacts to a closed pull request: tags releases and validates issues.

use tracing::info;

use crate::error::AutomationError;
use crate::events::PullRequestEvent;
use crate::github::models::NewRelease;
use crate::jira::IssueView;
use crate::rules::{ReleaseTitle, extract_issue_key, release_notes_from_body};
use crate::settings::AutomationSettings;

use super::{Effect, EffectExecutor, HandlerContext, found};

/// Handle a closed pull request.
///
/// # Errors
///
/// Propagates failures to create the release or transition the issue.
pub async fn handle(
    context: &HandlerContext<'_>,
    event: &PullRequestEvent,
) -> Result<Vec<Effect>, AutomationError> {
    let pull = &event.pull_request;
    let repository = &event.repository;
    if !pull.merged {
        info!(%repository, number = pull.number, "pull request is not merged - ignoring");
        return Ok(Vec::new());
    }

    let executor = EffectExecutor::new(context);
    let mut executed = executor
        .run(decide_release(context.settings, event).into_iter().collect())
        .await?;

    let Some(key) = extract_issue_key(&pull.title, pull.body.as_deref()) else {
        info!(%repository, number = pull.number, "no issue key in the pull request - ignoring");
        return Ok(executed);
    };
    let tracker = context.collaborators.tracker;
    let Some(issue) = found("issue", tracker.issue(key.as_str()).await) else {
        info!(%repository, number = pull.number, issue = %key, "no issue found - ignoring");
        return Ok(executed);
    };

    executed.extend(
        executor
            .run(decide_status(context.settings, &issue).into_iter().collect())
            .await?,
    );
    Ok(executed)
}

/// Decide whether a merged pull request is a release candidate to tag.
#[must_use]
pub fn decide_release(settings: &AutomationSettings, event: &PullRequestEvent) -> Option<Effect> {
    let pull = &event.pull_request;
    if !pull.merged || pull.head_ref != settings.release_branch() {
        return None;
    }

    let Some(title) = ReleaseTitle::parse(&pull.title) else {
        info!(
            title = %pull.title,
            "couldn't extract the tag and release name from the title - no tag will be created"
        );
        return None;
    };

    Some(Effect::CreateRelease {
        repository: event.repository.clone(),
        release: NewRelease {
            tag_name: title.tag_name(),
            name: title.release_name().to_owned(),
            body: release_notes_from_body(pull.body.as_deref().unwrap_or_default()),
            target_commitish: pull.base_ref.clone(),
            draft: false,
        },
    })
}

/// Decide the status transition for the issue of a merged pull request.
#[must_use]
pub fn decide_status(settings: &AutomationSettings, issue: &IssueView) -> Option<Effect> {
    let validated = &settings.statuses.validated;
    if &issue.status == validated {
        info!(issue = %issue.key, status = %validated, "issue is already validated - ignoring");
        return None;
    }
    Some(Effect::SetIssueStatus {
        issue_id: issue.id.clone(),
        status: validated.clone(),
    })
}
