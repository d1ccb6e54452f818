//! Gateways for the hosting platform.
//!
//! The traits are the capability interfaces the handlers depend on; the
//! Octocrab implementation performs the real HTTP requests. Lookups return
//! `Ok(None)` when the resource does not exist.

mod client;
mod error_mapping;
mod git_data;
mod hosting;


pub use hosting::{DEFAULT_API_BASE, OctocrabHostingGateway};

use async_trait::async_trait;

use crate::error::AutomationError;
use crate::github::locator::{PersonalAccessToken, RepositoryRef};
use crate::github::models::{
    BranchView, CommitComparison, CommitView, GitCommit, MergeOutcome, NewBranch, NewGitCommit,
    NewPullRequest, NewRelease, PullRequestUpdate, PullRequestView, ReleaseView, RepositoryView,
};

/// Pull request, branch and release operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostingGateway: Send + Sync {
    /// Fetch a pull request by number.
    async fn pull_request(
        &self,
        repository: &RepositoryRef,
        number: u64,
    ) -> Result<Option<PullRequestView>, AutomationError>;

    /// Fetch a commit by SHA.
    async fn commit(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<Option<CommitView>, AutomationError>;

    /// Fetch repository metadata.
    async fn repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Option<RepositoryView>, AutomationError>;

    /// Fetch a branch by name.
    async fn branch(
        &self,
        repository: &RepositoryRef,
        name: &str,
    ) -> Result<Option<BranchView>, AutomationError>;

    /// Add labels to an issue or pull request, keeping existing ones.
    async fn add_labels(
        &self,
        repository: &RepositoryRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), AutomationError>;

    /// Replace all labels on an issue or pull request.
    async fn set_labels(
        &self,
        repository: &RepositoryRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), AutomationError>;

    /// Assign users as owners of an issue or pull request.
    async fn assign_owners(
        &self,
        repository: &RepositoryRef,
        number: u64,
        logins: &[String],
    ) -> Result<(), AutomationError>;

    /// Request reviews from users, skipping the pull request's author.
    async fn request_reviewers(
        &self,
        repository: &RepositoryRef,
        number: u64,
        logins: &[String],
    ) -> Result<(), AutomationError>;

    /// Create a branch from `base` with one seed file committed on it.
    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &NewBranch,
    ) -> Result<BranchView, AutomationError>;

    /// Open a pull request, acting as the token's owner when one is given.
    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &NewPullRequest,
        acting_as: Option<PersonalAccessToken>,
    ) -> Result<PullRequestView, AutomationError>;

    /// Change the title or body of a pull request.
    async fn update_pull_request(
        &self,
        repository: &RepositoryRef,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequestView, AutomationError>;

    /// Publish a release, creating its tag.
    async fn create_release(
        &self,
        repository: &RepositoryRef,
        release: &NewRelease,
    ) -> Result<ReleaseView, AutomationError>;

    /// Compare two refs (`base...head`).
    async fn compare_commits(
        &self,
        repository: &RepositoryRef,
        base: &str,
        head: &str,
    ) -> Result<CommitComparison, AutomationError>;

    /// List open pull requests from `head` into `base`.
    async fn open_pull_requests(
        &self,
        repository: &RepositoryRef,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequestView>, AutomationError>;
}

/// Low-level Git data operations used to rewrite branches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitDataGateway: Send + Sync {
    /// Fetch a Git commit object.
    async fn git_commit(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<GitCommit, AutomationError>;

    /// Create a Git commit object, returning it.
    async fn create_git_commit(
        &self,
        repository: &RepositoryRef,
        commit: &NewGitCommit,
    ) -> Result<GitCommit, AutomationError>;

    /// Create a branch ref pointing at `sha`.
    async fn create_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), AutomationError>;

    /// Move a branch ref to `sha`.
    async fn update_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), AutomationError>;

    /// Delete a branch ref.
    async fn delete_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
    ) -> Result<(), AutomationError>;

    /// Merge `head` into the branch `base`.
    async fn merge(
        &self,
        repository: &RepositoryRef,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<MergeOutcome, AutomationError>;
}
