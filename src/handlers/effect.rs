//! Commands produced by the decision functions and their execution.

use tracing::{debug, error, info};

use crate::error::AutomationError;
use crate::github::locator::RepositoryRef;
use crate::github::models::NewRelease;
use crate::github::rebase::{RebaseOutcome, rebase_branch};

use super::HandlerContext;

/// A side effect requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Add labels to a pull request, keeping existing ones.
    AddLabels {
        /// Repository of the pull request.
        repository: RepositoryRef,
        /// Pull request number.
        number: u64,
        /// Labels to add.
        labels: Vec<String>,
    },
    /// Move a tracker issue to a status.
    SetIssueStatus {
        /// Internal issue identifier.
        issue_id: String,
        /// Target status name.
        status: String,
    },
    /// Publish a release and tag.
    CreateRelease {
        /// Repository to release.
        repository: RepositoryRef,
        /// Release details.
        release: NewRelease,
    },
    /// Direct-message the person identified by `lookup`, unless they are the
    /// automation's own identity.
    NotifyAssignee {
        /// Email address or display name used for the credential lookup.
        lookup: String,
        /// Message text.
        message: String,
    },
    /// Rebase `head` onto `base`.
    RebaseBranch {
        /// Repository holding both branches.
        repository: RepositoryRef,
        /// Branch to rewrite.
        head: String,
        /// Branch to rebase onto.
        base: String,
    },
}

/// Performs [`Effect`]s against the collaborators in a [`HandlerContext`].
pub struct EffectExecutor<'ctx, 'a> {
    context: &'ctx HandlerContext<'a>,
}

impl<'ctx, 'a> EffectExecutor<'ctx, 'a> {
    /// Creates an executor bound to `context`.
    #[must_use]
    pub const fn new(context: &'ctx HandlerContext<'a>) -> Self {
        Self { context }
    }

    /// Executes `effects` in order, returning them once all have run.
    ///
    /// # Errors
    ///
    /// Returns the first mutation failure. Notification failures are logged
    /// and do not stop execution.
    pub async fn run(&self, effects: Vec<Effect>) -> Result<Vec<Effect>, AutomationError> {
        for effect in &effects {
            self.apply(effect).await?;
        }
        Ok(effects)
    }

    async fn apply(&self, effect: &Effect) -> Result<(), AutomationError> {
        let collaborators = &self.context.collaborators;
        match effect {
            Effect::AddLabels {
                repository,
                number,
                labels,
            } => {
                info!(%repository, number, ?labels, "adding labels");
                collaborators
                    .hosting
                    .add_labels(repository, *number, labels)
                    .await
            }
            Effect::SetIssueStatus { issue_id, status } => {
                info!(issue_id, status, "setting issue status");
                collaborators.tracker.set_issue_status(issue_id, status).await
            }
            Effect::CreateRelease {
                repository,
                release,
            } => {
                info!(%repository, tag = %release.tag_name, "creating release");
                collaborators
                    .hosting
                    .create_release(repository, release)
                    .await
                    .map(|_| ())
            }
            Effect::NotifyAssignee { lookup, message } => {
                if let Err(failure) = self.notify(lookup, message).await {
                    error!(lookup, error = %failure, "could not notify assignee");
                }
                Ok(())
            }
            Effect::RebaseBranch {
                repository,
                head,
                base,
            } => self.rebase(repository, head, base).await,
        }
    }

    async fn notify(&self, lookup: &str, message: &str) -> Result<(), AutomationError> {
        let collaborators = &self.context.collaborators;
        let credentials = collaborators.credentials.resolve(lookup).await?;
        if credentials.github_username == self.context.settings.github_write_user {
            debug!(lookup, "assignee is the automation user; not notifying");
            return Ok(());
        }
        info!(lookup, "sending a chat message to the assignee");
        collaborators
            .chat
            .send_direct_message(&credentials.slack_id, message)
            .await
    }

    async fn rebase(
        &self,
        repository: &RepositoryRef,
        head: &str,
        base: &str,
    ) -> Result<(), AutomationError> {
        let collaborators = &self.context.collaborators;
        info!(%repository, head, base, "rebasing branch");
        let outcome = rebase_branch(
            collaborators.hosting,
            collaborators.git_data,
            repository,
            head,
            base,
        )
        .await?;
        match outcome {
            RebaseOutcome::UpToDate => info!(%repository, head, "branch is up to date"),
            RebaseOutcome::Rebased { commits } => {
                info!(%repository, head, commits, "branch rebased");
            }
            RebaseOutcome::Conflict { sha } => {
                error!(%repository, head, %sha, "rebase conflicted - giving up");
            }
            RebaseOutcome::Truncated { listed, ahead_by } => {
                error!(
                    %repository,
                    head,
                    listed,
                    ahead_by,
                    "rebase skipped - commit list truncated"
                );
            }
        }
        Ok(())
    }
}
