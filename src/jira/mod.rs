//! Issue tracker access.
//!
//! Handlers depend on [`TrackerGateway`]; [`JiraGateway`] implements it over
//! the Jira REST API.

mod client;

pub use client::{JiraConfig, JiraGateway};

use async_trait::async_trait;

use crate::error::AutomationError;

/// Person an issue is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueAssignee {
    /// Email address, when the tracker exposes it.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
}

impl IssueAssignee {
    /// Value used to look up the assignee's credentials: the email address,
    /// falling back to the display name.
    #[must_use]
    pub fn credentials_lookup(&self) -> Option<&str> {
        [self.email.as_deref(), self.display_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
    }
}

/// Snapshot of a tracker issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueView {
    /// Internal issue identifier.
    pub id: String,
    /// Issue key such as `STUDIO-123`.
    pub key: String,
    /// Summary line.
    pub summary: String,
    /// Description text.
    pub description: Option<String>,
    /// Current status name.
    pub status: String,
    /// Issue type name.
    pub issue_type: String,
    /// Assignee, if any.
    pub assignee: Option<IssueAssignee>,
    /// Keys of the issue's subtasks.
    pub subtasks: Vec<String>,
    /// Repository the issue's work belongs in.
    pub repository: Option<String>,
}

/// Issue lookups and status transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerGateway: Send + Sync {
    /// Fetch an issue by key.
    async fn issue(&self, key: &str) -> Result<Option<IssueView>, AutomationError>;

    /// Move an issue to the named status.
    async fn set_issue_status(&self, issue_id: &str, status: &str)
    -> Result<(), AutomationError>;

    /// Numbers of the open pull requests linked to an issue.
    async fn linked_pull_request_numbers(
        &self,
        issue_id: &str,
    ) -> Result<Vec<u64>, AutomationError>;
}
