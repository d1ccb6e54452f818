//! Event handlers.
//!
//! Each handler fetches what it needs, hands the fetched views to a pure
//! decision function, and runs the resulting [`Effect`]s through the
//! [`EffectExecutor`]. Handlers return the effects that were executed.
//!
//! | Event | Handler |
//! |-------|---------|
//! | `check_suite` completed | [`check_suite::handle`] |
//! | `pull_request` closed | [`pull_request_closed::handle`] |
//! | `pull_request` ready for review | [`ready_for_review::handle`] |
//! | `pull_request` synchronize | [`epic_rebase::handle`] |
//! | manual: issue pull request | [`issue_pull_request::handle`] |
//! | manual: release pull request | [`release_pull_request::handle`] |

pub mod check_suite;
pub mod effect;
pub mod epic_rebase;
pub mod issue_pull_request;
pub mod pull_request_closed;
pub mod ready_for_review;
pub mod release_pull_request;

pub use effect::{Effect, EffectExecutor};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::credentials::CredentialResolver;
use crate::error::AutomationError;
use crate::events::{AutomationEvent, ManualTrigger};
use crate::github::gateway::{GitDataGateway, HostingGateway};
use crate::jira::TrackerGateway;
use crate::settings::AutomationSettings;
use crate::slack::ChatGateway;

/// The external systems a handler talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Hosting platform.
    pub hosting: &'a dyn HostingGateway,
    /// Git data operations on the hosting platform.
    pub git_data: &'a dyn GitDataGateway,
    /// Issue tracker.
    pub tracker: &'a dyn TrackerGateway,
    /// Team chat.
    pub chat: &'a dyn ChatGateway,
    /// Credential lookup.
    pub credentials: &'a dyn CredentialResolver,
}

/// Everything a handler invocation needs.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Labels, branch names, statuses and identities.
    pub settings: &'a AutomationSettings,
    /// External systems.
    pub collaborators: Collaborators<'a>,
    /// Invocation time, used for release titles and seed files.
    pub now: DateTime<Utc>,
}

impl<'a> HandlerContext<'a> {
    /// Builds a context stamped with the current time.
    #[must_use]
    pub fn new(settings: &'a AutomationSettings, collaborators: Collaborators<'a>) -> Self {
        Self {
            settings,
            collaborators,
            now: Utc::now(),
        }
    }

    /// Returns a copy of the context with a fixed invocation time.
    #[must_use]
    pub const fn at(self, now: DateTime<Utc>) -> Self {
        Self { now, ..self }
    }
}

/// Run the handler for `event`.
///
/// # Errors
///
/// Propagates mutation failures from the handler.
pub async fn dispatch(
    context: &HandlerContext<'_>,
    event: AutomationEvent,
) -> Result<Vec<Effect>, AutomationError> {
    match event {
        AutomationEvent::CheckSuiteCompleted(suite) => check_suite::handle(context, &suite).await,
        AutomationEvent::PullRequestClosed(pull) => {
            pull_request_closed::handle(context, &pull).await
        }
        AutomationEvent::PullRequestReadyForReview(pull) => {
            ready_for_review::handle(context, &pull).await
        }
        AutomationEvent::EpicRebase(pull) => epic_rebase::handle(context, &pull).await,
        AutomationEvent::Manual(ManualTrigger::CreatePullRequestForIssue { email, issue_key }) => {
            issue_pull_request::handle(context, &email, &issue_key).await?;
            Ok(Vec::new())
        }
        AutomationEvent::Manual(ManualTrigger::CreateReleasePullRequest { email, repository }) => {
            release_pull_request::handle(context, &email, &repository).await?;
            Ok(Vec::new())
        }
        AutomationEvent::Ignored { event_name, action } => {
            info!(
                event_name = event_name.as_str(),
                action = action.as_deref(),
                "no handler for event - ignoring"
            );
            Ok(Vec::new())
        }
    }
}

/// Degrades a lookup fault to "absent", logging it.
pub(crate) fn found<T>(what: &str, result: Result<Option<T>, AutomationError>) -> Option<T> {
    result.unwrap_or_else(|error| {
        warn!(what, %error, "lookup failed; treating as absent");
        None
    })
}
