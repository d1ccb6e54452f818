//! Views of hosting-platform resources and the requests that mutate them.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public views.

use serde::{Deserialize, Serialize};

/// Snapshot of a pull request at fetch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestView {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: String,
    /// Markdown body, if any.
    pub body: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Head branch name.
    pub head_ref: String,
    /// Base branch name.
    pub base_ref: String,
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// Label names.
    pub labels: Vec<String>,
    /// Login of the pull request author.
    pub author: Option<String>,
}

impl PullRequestView {
    /// Returns true when the pull request carries `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|existing| existing == label)
    }
}

/// A commit and its message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitView {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
}

/// Repository metadata needed to branch from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryView {
    /// Repository name.
    pub name: String,
    /// Default branch, e.g. `develop`.
    pub default_branch: String,
}

/// A branch and the commit it points at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchView {
    /// Branch name.
    pub name: String,
    /// SHA of the branch head.
    pub sha: String,
}

/// A commit listed by a ref comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparedCommit {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Hosting login of the author, when the author has an account.
    pub author_login: Option<String>,
    /// Git author name.
    pub author_name: Option<String>,
    /// Parent SHAs.
    pub parents: Vec<String>,
}

/// Result of comparing a base ref with a head ref.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitComparison {
    /// Commits on head that are not on base.
    pub ahead_by: u64,
    /// Commits on base that are not on head.
    pub behind_by: u64,
    /// Total commits in the comparison.
    pub total_commits: u64,
    /// Commits on head that are not on base, oldest first.
    pub commits: Vec<ComparedCommit>,
}

/// Git author or committer signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSignature {
    /// Name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// ISO 8601 timestamp.
    pub date: Option<String>,
}

/// A low-level Git commit object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitCommit {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// SHA of the commit's tree.
    pub tree_sha: String,
    /// Parent SHAs.
    pub parents: Vec<String>,
    /// Original author.
    pub author: Option<GitSignature>,
}

/// Request to create a low-level Git commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGitCommit {
    /// Commit message.
    pub message: String,
    /// Tree SHA.
    pub tree: String,
    /// Parent SHAs.
    pub parents: Vec<String>,
    /// Author to record; the token owner is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<GitSignature>,
}

/// Result of asking the platform to merge one ref into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A merge commit was created.
    Merged(GitCommit),
    /// The head was already contained in the base.
    NothingToMerge,
    /// The merge conflicted.
    Conflict,
}

/// Request to create a branch seeded with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBranch {
    /// Branch to fork from.
    pub base: String,
    /// Name of the branch to create.
    pub name: String,
    /// Path of the seed file.
    pub file_path: String,
    /// Contents of the seed file.
    pub file_content: String,
    /// Message of the commit adding the seed file.
    pub commit_message: String,
}

/// Request to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    /// Branch the changes merge into.
    pub base: String,
    /// Branch containing the changes.
    pub head: String,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Whether to open the pull request as a draft.
    pub draft: bool,
}

/// Fields to change on an existing pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Request to publish a release and its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    /// Tag to create, e.g. `v2021-01-12-0426`.
    pub tag_name: String,
    /// Display name, e.g. `Energetic Eagle`.
    pub name: String,
    /// Release notes.
    pub body: String,
    /// Branch or SHA the tag points at.
    pub target_commitish: String,
    /// Whether the release is a draft.
    pub draft: bool,
}

/// A published release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseView {
    /// Release identifier.
    pub id: u64,
    /// Tag name.
    pub tag_name: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) merged: Option<bool>,
    pub(crate) head: Option<ApiBranchRef>,
    pub(crate) base: Option<ApiBranchRef>,
    #[serde(default)]
    pub(crate) labels: Vec<ApiLabel>,
    #[serde(default)]
    pub(crate) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranchRef {
    #[serde(rename = "ref")]
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabel {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommit {
    pub(crate) sha: String,
    pub(crate) commit: ApiCommitDetail,
    pub(crate) author: Option<ApiUser>,
    #[serde(default)]
    pub(crate) parents: Vec<ApiSha>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitDetail {
    #[serde(default)]
    pub(crate) message: String,
    pub(crate) author: Option<GitSignature>,
    pub(crate) tree: Option<ApiSha>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiSha {
    pub(crate) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitCommit {
    pub(crate) sha: String,
    #[serde(default)]
    pub(crate) message: String,
    pub(crate) tree: ApiSha,
    #[serde(default)]
    pub(crate) parents: Vec<ApiSha>,
    pub(crate) author: Option<GitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) default_branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranch {
    pub(crate) name: String,
    pub(crate) commit: ApiSha,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComparison {
    #[serde(default)]
    pub(crate) ahead_by: u64,
    #[serde(default)]
    pub(crate) behind_by: u64,
    #[serde(default)]
    pub(crate) total_commits: u64,
    #[serde(default)]
    pub(crate) commits: Vec<ApiCommit>,
}

impl From<ApiPullRequest> for PullRequestView {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            body: value.body,
            html_url: value.html_url.unwrap_or_default(),
            head_ref: value.head.map(|head| head.name).unwrap_or_default(),
            base_ref: value.base.map(|base| base.name).unwrap_or_default(),
            merged: value.merged.unwrap_or(false),
            labels: value.labels.into_iter().map(|label| label.name).collect(),
            author: value.user.and_then(|user| user.login),
        }
    }
}

impl From<ApiCommit> for CommitView {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
        }
    }
}

impl From<ApiCommit> for ComparedCommit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            author_login: value.author.and_then(|author| author.login),
            author_name: value.commit.author.map(|author| author.name),
            message: value.commit.message,
            parents: value.parents.into_iter().map(|parent| parent.sha).collect(),
        }
    }
}

impl From<ApiCommit> for GitCommit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
            tree_sha: value.commit.tree.map(|tree| tree.sha).unwrap_or_default(),
            parents: value.parents.into_iter().map(|parent| parent.sha).collect(),
            author: value.commit.author,
        }
    }
}

impl From<ApiGitCommit> for GitCommit {
    fn from(value: ApiGitCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.message,
            tree_sha: value.tree.sha,
            parents: value.parents.into_iter().map(|parent| parent.sha).collect(),
            author: value.author,
        }
    }
}

impl From<ApiRepository> for RepositoryView {
    fn from(value: ApiRepository) -> Self {
        Self {
            name: value.name,
            default_branch: value.default_branch.unwrap_or_else(|| "master".to_owned()),
        }
    }
}

impl From<ApiBranch> for BranchView {
    fn from(value: ApiBranch) -> Self {
        Self {
            name: value.name,
            sha: value.commit.sha,
        }
    }
}

impl From<ApiComparison> for CommitComparison {
    fn from(value: ApiComparison) -> Self {
        Self {
            ahead_by: value.ahead_by,
            behind_by: value.behind_by,
            total_commits: value.total_commits,
            commits: value.commits.into_iter().map(ComparedCommit::from).collect(),
        }
    }
}
