//! Hosting platform access: repository references, resource views, the
//! capability traits handlers depend on, and their Octocrab implementation.

pub mod gateway;
pub mod locator;
pub mod models;
pub mod rebase;

pub use gateway::{DEFAULT_API_BASE, GitDataGateway, HostingGateway, OctocrabHostingGateway};
pub use locator::{PersonalAccessToken, RepositoryName, RepositoryOwner, RepositoryRef};
pub use models::{
    BranchView, CommitComparison, CommitView, ComparedCommit, GitCommit, GitSignature,
    MergeOutcome, NewBranch, NewGitCommit, NewPullRequest, NewRelease, PullRequestUpdate,
    PullRequestView, ReleaseView, RepositoryView,
};
pub use rebase::{RebaseOutcome, rebase_branch};

#[cfg(test)]
pub use gateway::{MockGitDataGateway, MockHostingGateway};
