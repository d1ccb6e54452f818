//! Manual trigger: create or refresh the release candidate pull request
//! that carries the integration branch into production.

use chrono::{DateTime, Datelike, Utc};
use tracing::{error, info};

use crate::credentials::Credentials;
use crate::error::AutomationError;
use crate::github::locator::RepositoryRef;
use crate::github::models::{BranchView, ComparedCommit, NewPullRequest, PullRequestUpdate};
use crate::rules::ReleaseTitle;

use super::{HandlerContext, found};

const RELEASE_NAMES: [&str; 26] = [
    "Agile Antelope",
    "Brave Bison",
    "Clever Cheetah",
    "Daring Dolphin",
    "Energetic Eagle",
    "Fearless Falcon",
    "Gentle Giraffe",
    "Happy Hedgehog",
    "Intrepid Ibis",
    "Jolly Jaguar",
    "Keen Koala",
    "Lively Lemur",
    "Mighty Moose",
    "Nimble Narwhal",
    "Optimistic Otter",
    "Plucky Panda",
    "Quick Quokka",
    "Radiant Raccoon",
    "Spirited Seal",
    "Tenacious Tiger",
    "Upbeat Urchin",
    "Valiant Vulture",
    "Witty Walrus",
    "Xenial Xerus",
    "Youthful Yak",
    "Zesty Zebra",
];

/// What the trigger ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Nothing was changed; the message explains why.
    Skipped {
        /// Message sent to the requester.
        message: String,
    },
    /// An open release pull request was refreshed.
    Updated {
        /// Pull request number.
        number: u64,
    },
    /// A new release pull request was opened.
    Created {
        /// Pull request number.
        number: u64,
    },
}

/// Alliterative name for a release cut at `now`.
#[must_use]
pub fn release_name(now: DateTime<Utc>) -> &'static str {
    let index = usize::try_from(now.ordinal0())
        .unwrap_or_default()
        .checked_rem(RELEASE_NAMES.len())
        .unwrap_or_default();
    RELEASE_NAMES.get(index).copied().unwrap_or("Agile Antelope")
}

/// Title of a release cut at `now`.
#[must_use]
pub fn release_title(now: DateTime<Utc>) -> ReleaseTitle {
    ReleaseTitle::new(now.format("%Y-%m-%d-%H%M").to_string(), release_name(now))
}

/// Pull request body listing each commit's first line and author.
#[must_use]
pub fn release_body(title: &ReleaseTitle, commits: &[ComparedCommit]) -> String {
    let mut body = format!("## {}\n", title.to_title());
    for commit in commits {
        let summary = commit.message.lines().next().unwrap_or_default();
        let author = commit
            .author_login
            .as_deref()
            .map(|login| format!("@{login}"))
            .or_else(|| commit.author_name.clone())
            .unwrap_or_else(|| "unknown".to_owned());
        body.push_str(&format!("\n- {summary} ({author})"));
    }
    body
}

/// Create or refresh the release pull request for `repository_name`.
///
/// # Errors
///
/// Propagates credential, hosting and chat failures.
pub async fn handle(
    context: &HandlerContext<'_>,
    email: &str,
    repository_name: &str,
) -> Result<ReleaseOutcome, AutomationError> {
    let settings = context.settings;
    let collaborators = &context.collaborators;
    let hosting = collaborators.hosting;

    let requester = collaborators.credentials.resolve(email).await?;
    let repository = RepositoryRef::new(&settings.organization, repository_name)?;

    let develop_name = &settings.develop_branch;
    let Some(develop) = found("branch", hosting.branch(&repository, develop_name).await) else {
        let message = format!(
            "Branch '{develop_name}' could not be found for repository \
             {repository_name} - giving up"
        );
        return skip(context, &requester, message, true).await;
    };

    let Some(production) = production_branch(context, &repository).await else {
        let message = format!(
            "Master branch could not be found for repository {repository_name} - giving up"
        );
        return skip(context, &requester, message, true).await;
    };

    let comparison = hosting
        .compare_commits(&repository, &production.name, &develop.name)
        .await?;
    if comparison.total_commits == 0 || comparison.commits.is_empty() {
        let message = format!(
            "Branch '{}' already contains the latest release - nothing to do",
            production.name
        );
        return skip(context, &requester, message, false).await;
    }

    let release_branch = settings.release_branch();
    let git_data = collaborators.git_data;
    if found("branch", hosting.branch(&repository, &release_branch).await).is_some() {
        git_data
            .update_ref(&repository, &release_branch, &develop.sha, true)
            .await?;
    } else {
        git_data
            .create_ref(&repository, &release_branch, &develop.sha)
            .await?;
    }

    let title = release_title(context.now);
    let body = release_body(&title, &comparison.commits);
    let open = hosting
        .open_pull_requests(&repository, &release_branch, &production.name)
        .await?
        .into_iter()
        .next();

    let (pull, outcome) = if let Some(existing) = open {
        info!(
            "An existing release pull request was found ({repository_name}#{}) - \
             updating the release notes...",
            existing.number
        );
        let update = PullRequestUpdate {
            title: Some(title.to_title()),
            body: Some(body),
        };
        let mut updated = hosting
            .update_pull_request(&repository, existing.number, &update)
            .await?;
        if updated.labels.is_empty() {
            updated.labels = existing.labels;
        }
        let number = updated.number;
        (updated, ReleaseOutcome::Updated { number })
    } else {
        info!("No existing release pull request was found - creating it...");
        let request = NewPullRequest {
            base: production.name.clone(),
            head: release_branch.clone(),
            title: title.to_title(),
            body,
            draft: true,
        };
        match hosting.create_pull_request(&repository, &request, None).await {
            Ok(created) => {
                let number = created.number;
                (created, ReleaseOutcome::Created { number })
            }
            Err(failure) => {
                let message = format!(
                    "An unknown error occurred while creating a release pull request \
                     for repository '{repository_name}'"
                );
                error!(error = %failure, "{message}");
                send(context, &requester, &message).await?;
                return Err(failure);
            }
        }
    };

    let mut labels = pull.labels.clone();
    for label in [&settings.labels.in_progress, &settings.labels.release] {
        if !pull.has_label(label) {
            labels.push(label.clone());
        }
    }
    hosting.set_labels(&repository, pull.number, &labels).await?;
    hosting
        .assign_owners(&repository, pull.number, &[requester.github_username.clone()])
        .await?;

    let url = settings.pull_request_url(repository_name, pull.number);
    send(context, &requester, &format!("Here's your release pull request: {url}")).await?;
    Ok(outcome)
}

async fn production_branch(
    context: &HandlerContext<'_>,
    repository: &RepositoryRef,
) -> Option<BranchView> {
    let hosting = context.collaborators.hosting;
    for name in &context.settings.production_branches {
        if let Some(branch) = found("branch", hosting.branch(repository, name).await) {
            return Some(branch);
        }
    }
    None
}

async fn skip(
    context: &HandlerContext<'_>,
    requester: &Credentials,
    message: String,
    is_error: bool,
) -> Result<ReleaseOutcome, AutomationError> {
    if is_error {
        error!("{message}");
    } else {
        info!("{message}");
    }
    send(context, requester, &message).await?;
    Ok(ReleaseOutcome::Skipped { message })
}

async fn send(
    context: &HandlerContext<'_>,
    recipient: &Credentials,
    message: &str,
) -> Result<(), AutomationError> {
    context
        .collaborators
        .chat
        .send_direct_message(&recipient.slack_id, message)
        .await
}
