//! Manual trigger: create a branch and draft pull request for a tracker
//! issue on behalf of its assignee.

use tracing::{error, info};

use crate::credentials::Credentials;
use crate::error::AutomationError;
use crate::github::locator::{PersonalAccessToken, RepositoryRef};
use crate::github::models::{NewBranch, NewPullRequest};
use crate::jira::IssueView;
use crate::rules::issue_branch_name;
use crate::settings::AutomationSettings;
use crate::template::{PullRequestTemplateVars, render_pull_request_body};

use super::{HandlerContext, found};

/// What the trigger ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuePullRequestOutcome {
    /// No pull request was created; the message explains why.
    Rejected {
        /// Message sent to the requester or assignee.
        message: String,
    },
    /// An open pull request linked to the issue was reused.
    Reused {
        /// Pull request number.
        number: u64,
    },
    /// A new draft pull request was created.
    Created {
        /// Pull request number.
        number: u64,
    },
}

/// The branch and pull request to create for an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuePullRequestPlan {
    /// Repository name within the organisation.
    pub repository: String,
    /// Branch the work happens on.
    pub branch: String,
    /// Pull request title.
    pub title: String,
    /// Browser URL of the issue.
    pub issue_url: String,
}

/// Result of checking an issue before any branch or pull request exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueDecision {
    /// The issue cannot get a pull request.
    Rejected(String),
    /// Go ahead with this plan.
    Proceed(IssuePullRequestPlan),
}

/// Decide whether `issue`, assigned to `assignee`, can get a pull request.
#[must_use]
pub fn plan(
    settings: &AutomationSettings,
    issue: &IssueView,
    assignee: &Credentials,
) -> IssueDecision {
    let issue_url = settings.issue_url(&issue.key);
    let link = format!("<{issue_url}|{}>", issue.key);

    if !issue.subtasks.is_empty() {
        return IssueDecision::Rejected(format!(
            "Issue {link} has subtasks, so no pull request was created"
        ));
    }
    let Some(repository) = issue.repository.clone() else {
        return IssueDecision::Rejected(format!(
            "No repository is set for issue {link}, so no pull request was created"
        ));
    };

    IssueDecision::Proceed(IssuePullRequestPlan {
        repository,
        branch: issue_branch_name(&assignee.email, &issue.key, &issue.summary),
        title: format!("[{}] {}", issue.key, issue.summary),
        issue_url,
    })
}

/// Create (or find) the pull request for `issue_key`, requested by `email`.
///
/// # Errors
///
/// Propagates credential, hosting and chat failures.
pub async fn handle(
    context: &HandlerContext<'_>,
    email: &str,
    issue_key: &str,
) -> Result<IssuePullRequestOutcome, AutomationError> {
    let collaborators = &context.collaborators;
    let settings = context.settings;

    info!(issue = issue_key, "fetching the issue");
    let Some(issue) = found("issue", collaborators.tracker.issue(issue_key).await) else {
        let message =
            format!("Issue {issue_key} could not be found, so no pull request was created");
        return reject_to(context, email, message).await;
    };

    let Some(lookup) = issue
        .assignee
        .as_ref()
        .and_then(|assignee| assignee.credentials_lookup())
    else {
        let message = format!(
            "Issue <{}|{}> is not assigned to anyone, so no pull request was created",
            settings.issue_url(&issue.key),
            issue.key
        );
        return reject_to(context, email, message).await;
    };
    let assignee = collaborators.credentials.resolve(lookup).await?;
    info!(issue = %issue.key, owner = %assignee.github_username, "pull request owner resolved");

    let accepted = match plan(settings, &issue, &assignee) {
        IssueDecision::Rejected(message) => {
            info!(issue = %issue.key, "{message}");
            send(context, &assignee, &message).await?;
            return Ok(IssuePullRequestOutcome::Rejected { message });
        }
        IssueDecision::Proceed(accepted) => accepted,
    };

    let repository = RepositoryRef::new(&settings.organization, &accepted.repository)?;
    let repo = found("repository", collaborators.hosting.repository(&repository).await)
        .ok_or_else(|| AutomationError::NotFound {
            message: format!("repository {repository}"),
        })?;

    let linked = collaborators
        .tracker
        .linked_pull_request_numbers(&issue.id)
        .await?;
    let (number, outcome) = if let Some(&existing) = linked.first() {
        info!(%repository, number = existing, "pull request already exists");
        (existing, IssuePullRequestOutcome::Reused { number: existing })
    } else {
        let created = create(
            context,
            &repository,
            &repo.default_branch,
            &issue,
            &assignee,
            &accepted,
        )
        .await?;
        (created, IssuePullRequestOutcome::Created { number: created })
    };

    let hosting = collaborators.hosting;
    hosting
        .add_labels(&repository, number, &[settings.labels.in_progress.clone()])
        .await?;
    hosting
        .assign_owners(&repository, number, &[assignee.github_username.clone()])
        .await?;

    let url = settings.pull_request_url(repository.name().as_str(), number);
    let message = format!(
        "Here's your pull request: {url}\n\
         Please prefix your commits with `[#{number}] [{key}]`\n\n\
         Checkout the new branch with:\n\
         `git checkout --track origin/{branch}`",
        key = issue.key,
        branch = accepted.branch,
    );
    send(context, &assignee, &message).await?;
    info!(%url, issue = %issue.key, "finished creating the pull request");
    Ok(outcome)
}

async fn create(
    context: &HandlerContext<'_>,
    repository: &RepositoryRef,
    default_branch: &str,
    issue: &IssueView,
    assignee: &Credentials,
    accepted: &IssuePullRequestPlan,
) -> Result<u64, AutomationError> {
    let hosting = context.collaborators.hosting;
    let announcement = format!(
        "Creating a pull request for <{}|{}>...",
        accepted.issue_url, issue.key
    );
    send(context, assignee, &announcement).await?;

    if found("branch", hosting.branch(repository, &accepted.branch).await).is_none() {
        info!(%repository, branch = %accepted.branch, "creating the branch");
        let branch = NewBranch {
            base: default_branch.to_owned(),
            name: accepted.branch.clone(),
            file_path: format!(".meta/{}.md", issue.key),
            file_content: format!(
                "{}\n\nCreated at {}",
                accepted.issue_url,
                context.now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            ),
            commit_message: format!("[{}] [skip ci] Create pull request.", issue.key),
        };
        hosting.create_branch(repository, &branch).await?;
    }

    let body = render_pull_request_body(
        &context.settings.pull_request_template,
        &PullRequestTemplateVars {
            summary: &issue.summary,
            description: issue.description.as_deref(),
            issue_type: &issue.issue_type,
            jira_url: &accepted.issue_url,
        },
    )?;
    let request = NewPullRequest {
        base: default_branch.to_owned(),
        head: accepted.branch.clone(),
        title: accepted.title.clone(),
        body,
        draft: true,
    };
    let acting_as = PersonalAccessToken::new(&assignee.github_token).ok();
    let created = hosting
        .create_pull_request(repository, &request, acting_as)
        .await?;
    info!(%repository, number = created.number, "created pull request");
    Ok(created.number)
}

async fn reject_to(
    context: &HandlerContext<'_>,
    email: &str,
    message: String,
) -> Result<IssuePullRequestOutcome, AutomationError> {
    error!("{message}");
    let requester = context.collaborators.credentials.resolve(email).await?;
    send(context, &requester, &message).await?;
    Ok(IssuePullRequestOutcome::Rejected { message })
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

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{IssueDecision, plan};
    use crate::credentials::Credentials;
    use crate::jira::IssueView;
    use crate::settings::AutomationSettings;

    #[fixture]
    fn assignee() -> Credentials {
        Credentials {
            email: "dave.smith@example.com".to_owned(),
            github_username: "dave".to_owned(),
            slack_id: "U123".to_owned(),
            ..Credentials::default()
        }
    }

    fn issue() -> IssueView {
        IssueView {
            id: "10042".to_owned(),
            key: "STUDIO-42".to_owned(),
            summary: "Make the widget spin!".to_owned(),
            repository: Some("actions".to_owned()),
            ..IssueView::default()
        }
    }

    #[rstest]
    fn plans_branch_and_title(assignee: Credentials) {
        let settings = AutomationSettings::default();
        let IssueDecision::Proceed(proposal) = plan(&settings, &issue(), &assignee) else {
            panic!("issue should be accepted");
        };

        assert_eq!(proposal.repository, "actions");
        assert_eq!(proposal.branch, "dave/studio-42-make-the-widget-spin");
        assert_eq!(proposal.title, "[STUDIO-42] Make the widget spin!");
        assert_eq!(proposal.issue_url, "https://example.atlassian.net/browse/STUDIO-42");
    }

    #[rstest]
    fn issues_with_subtasks_are_rejected(assignee: Credentials) {
        let settings = AutomationSettings::default();
        let with_subtasks = IssueView {
            subtasks: vec!["STUDIO-43".to_owned()],
            ..issue()
        };

        assert_eq!(
            plan(&settings, &with_subtasks, &assignee),
            IssueDecision::Rejected(
                "Issue <https://example.atlassian.net/browse/STUDIO-42|STUDIO-42> has subtasks, \
                 so no pull request was created"
                    .to_owned()
            )
        );
    }

    #[rstest]
    fn issues_without_repository_are_rejected(assignee: Credentials) {
        let settings = AutomationSettings::default();
        let without_repository = IssueView {
            repository: None,
            ..issue()
        };

        let IssueDecision::Rejected(message) = plan(&settings, &without_repository, &assignee)
        else {
            panic!("issue should be rejected");
        };
        assert!(message.starts_with("No repository is set for issue <"));
    }

    #[rstest]
    fn subtasks_are_checked_before_repository(assignee: Credentials) {
        let settings = AutomationSettings::default();
        let both = IssueView {
            subtasks: vec!["STUDIO-43".to_owned()],
            repository: None,
            ..issue()
        };

        let IssueDecision::Rejected(message) = plan(&settings, &both, &assignee) else {
            panic!("issue should be rejected");
        };
        assert!(message.contains("has subtasks"));
    }
}
