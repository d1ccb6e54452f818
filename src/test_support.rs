//! In-memory doubles for every collaborator, recording what handlers do.
//!
//! Lookups read from seeded maps; mutations are appended to journals the
//! tests inspect afterwards. Git data calls synthesise commits whose SHAs
//! follow from their trees, so a replayed commit `x` lands as
//! `commit-tree-x`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::credentials::{CredentialResolver, Credentials};
use crate::error::AutomationError;
use crate::github::gateway::{GitDataGateway, HostingGateway};
use crate::github::locator::{PersonalAccessToken, RepositoryRef};
use crate::github::models::{
    BranchView, CommitComparison, CommitView, GitCommit, MergeOutcome, NewBranch, NewGitCommit,
    NewPullRequest, NewRelease, PullRequestUpdate, PullRequestView, ReleaseView, RepositoryView,
};
use crate::handlers::{Collaborators, HandlerContext};
use crate::jira::{IssueView, TrackerGateway};
use crate::settings::AutomationSettings;
use crate::slack::ChatGateway;

/// A pull request created through the fake, with whether a user token was
/// supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    /// Repository, as `owner/name`.
    pub repository: String,
    /// The request.
    pub request: NewPullRequest,
    /// Whether the request was made with a user's token.
    pub acting_as_user: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    pull_requests: HashMap<(String, u64), PullRequestView>,
    commits: HashMap<String, CommitView>,
    repositories: HashMap<String, RepositoryView>,
    branches: HashMap<(String, String), BranchView>,
    comparisons: HashMap<String, CommitComparison>,
    open_pull_requests: Vec<PullRequestView>,
    issues: HashMap<String, IssueView>,
    linked_pull_requests: HashMap<String, Vec<u64>>,
    credentials: HashMap<String, Credentials>,
    fail_pull_request_creation: bool,
    next_number: u64,

    labels_added: Vec<(u64, Vec<String>)>,
    labels_set: Vec<(u64, Vec<String>)>,
    owners_assigned: Vec<(u64, Vec<String>)>,
    reviewers_requested: Vec<(u64, Vec<String>)>,
    branches_created: Vec<NewBranch>,
    pull_requests_created: Vec<CreatedPullRequest>,
    pull_requests_updated: Vec<(u64, PullRequestUpdate)>,
    releases: Vec<NewRelease>,
    ref_updates: Vec<(String, String)>,
    status_changes: Vec<(String, String)>,
    messages: Vec<(String, String)>,
}

/// Fake hosting platform, tracker, chat and credential service in one value.
#[derive(Debug, Default)]
pub struct FakePlatforms {
    state: Mutex<FakeState>,
}

impl FakePlatforms {
    /// Creates an empty fake.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Borrows the fake as every collaborator at once.
    #[must_use]
    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            hosting: self,
            git_data: self,
            tracker: self,
            chat: self,
            credentials: self,
        }
    }

    /// Builds a handler context around the fake.
    #[must_use]
    pub fn context<'a>(&'a self, settings: &'a AutomationSettings) -> HandlerContext<'a> {
        HandlerContext::new(settings, self.collaborators())
    }

    /// Seeds a pull request in repository `name`.
    pub fn add_pull_request(&self, name: &str, pull: PullRequestView) {
        self.state()
            .pull_requests
            .insert((name.to_owned(), pull.number), pull);
    }

    /// Seeds a commit.
    pub fn add_commit(&self, commit: CommitView) {
        self.state().commits.insert(commit.sha.clone(), commit);
    }

    /// Seeds repository metadata.
    pub fn add_repository(&self, repository: RepositoryView) {
        self.state()
            .repositories
            .insert(repository.name.clone(), repository);
    }

    /// Seeds a branch in repository `name`.
    pub fn add_branch(&self, name: &str, branch: BranchView) {
        self.state()
            .branches
            .insert((name.to_owned(), branch.name.clone()), branch);
    }

    /// Seeds the comparison returned for any refs in repository `name`.
    pub fn set_comparison(&self, name: &str, comparison: CommitComparison) {
        self.state().comparisons.insert(name.to_owned(), comparison);
    }

    /// Seeds an open pull request returned by open pull request searches.
    pub fn add_open_pull_request(&self, pull: PullRequestView) {
        self.state().open_pull_requests.push(pull);
    }

    /// Seeds a tracker issue.
    pub fn add_issue(&self, issue: IssueView) {
        self.state().issues.insert(issue.key.clone(), issue);
    }

    /// Seeds the open pull requests linked to issue `issue_id`.
    pub fn link_pull_requests(&self, issue_id: &str, numbers: Vec<u64>) {
        self.state()
            .linked_pull_requests
            .insert(issue_id.to_owned(), numbers);
    }

    /// Seeds the credentials returned for `lookup`.
    pub fn add_credentials(&self, lookup: &str, credentials: Credentials) {
        self.state()
            .credentials
            .insert(lookup.to_owned(), credentials);
    }

    /// Makes pull request creation fail.
    pub fn fail_pull_request_creation(&self) {
        self.state().fail_pull_request_creation = true;
    }

    /// Labels added, per pull request number.
    #[must_use]
    pub fn labels_added(&self) -> Vec<(u64, Vec<String>)> {
        self.state().labels_added.clone()
    }

    /// Label sets applied, per pull request number.
    #[must_use]
    pub fn labels_set(&self) -> Vec<(u64, Vec<String>)> {
        self.state().labels_set.clone()
    }

    /// Owners assigned, per pull request number.
    #[must_use]
    pub fn owners_assigned(&self) -> Vec<(u64, Vec<String>)> {
        self.state().owners_assigned.clone()
    }

    /// Reviewers requested, per pull request number.
    #[must_use]
    pub fn reviewers_requested(&self) -> Vec<(u64, Vec<String>)> {
        self.state().reviewers_requested.clone()
    }

    /// Branches created.
    #[must_use]
    pub fn branches_created(&self) -> Vec<NewBranch> {
        self.state().branches_created.clone()
    }

    /// Pull requests created.
    #[must_use]
    pub fn pull_requests_created(&self) -> Vec<CreatedPullRequest> {
        self.state().pull_requests_created.clone()
    }

    /// Pull request updates applied.
    #[must_use]
    pub fn pull_requests_updated(&self) -> Vec<(u64, PullRequestUpdate)> {
        self.state().pull_requests_updated.clone()
    }

    /// Releases published.
    #[must_use]
    pub fn releases(&self) -> Vec<NewRelease> {
        self.state().releases.clone()
    }

    /// Branch refs created or moved, as `(branch, sha)`.
    #[must_use]
    pub fn ref_updates(&self) -> Vec<(String, String)> {
        self.state().ref_updates.clone()
    }

    /// Issue transitions, as `(issue id, status)`.
    #[must_use]
    pub fn status_changes(&self) -> Vec<(String, String)> {
        self.state().status_changes.clone()
    }

    /// Chat messages sent, as `(chat user id, text)`.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, String)> {
        self.state().messages.clone()
    }
}

fn branch_key(repository: &RepositoryRef, name: &str) -> (String, String) {
    (repository.name().as_str().to_owned(), name.to_owned())
}

#[async_trait]
impl HostingGateway for FakePlatforms {
    async fn pull_request(
        &self,
        repository: &RepositoryRef,
        number: u64,
    ) -> Result<Option<PullRequestView>, AutomationError> {
        let key = (repository.name().as_str().to_owned(), number);
        Ok(self.state().pull_requests.get(&key).cloned())
    }

    async fn commit(
        &self,
        _repository: &RepositoryRef,
        sha: &str,
    ) -> Result<Option<CommitView>, AutomationError> {
        Ok(self.state().commits.get(sha).cloned())
    }

    async fn repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Option<RepositoryView>, AutomationError> {
        Ok(self
            .state()
            .repositories
            .get(repository.name().as_str())
            .cloned())
    }

    async fn branch(
        &self,
        repository: &RepositoryRef,
        name: &str,
    ) -> Result<Option<BranchView>, AutomationError> {
        Ok(self
            .state()
            .branches
            .get(&branch_key(repository, name))
            .cloned())
    }

    async fn add_labels(
        &self,
        _repository: &RepositoryRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), AutomationError> {
        self.state().labels_added.push((number, labels.to_vec()));
        Ok(())
    }

    async fn set_labels(
        &self,
        _repository: &RepositoryRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), AutomationError> {
        self.state().labels_set.push((number, labels.to_vec()));
        Ok(())
    }

    async fn assign_owners(
        &self,
        _repository: &RepositoryRef,
        number: u64,
        logins: &[String],
    ) -> Result<(), AutomationError> {
        self.state().owners_assigned.push((number, logins.to_vec()));
        Ok(())
    }

    async fn request_reviewers(
        &self,
        _repository: &RepositoryRef,
        number: u64,
        logins: &[String],
    ) -> Result<(), AutomationError> {
        self.state()
            .reviewers_requested
            .push((number, logins.to_vec()));
        Ok(())
    }

    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &NewBranch,
    ) -> Result<BranchView, AutomationError> {
        let created = BranchView {
            name: branch.name.clone(),
            sha: format!("{}-seed", branch.name),
        };
        let mut state = self.state();
        state.branches_created.push(branch.clone());
        state
            .branches
            .insert(branch_key(repository, &branch.name), created.clone());
        Ok(created)
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &NewPullRequest,
        acting_as: Option<PersonalAccessToken>,
    ) -> Result<PullRequestView, AutomationError> {
        let mut state = self.state();
        if state.fail_pull_request_creation {
            return Err(AutomationError::api("create pull request failed"));
        }
        state.next_number += 1;
        let number = 100 + state.next_number;
        state.pull_requests_created.push(CreatedPullRequest {
            repository: repository.to_string(),
            request: request.clone(),
            acting_as_user: acting_as.is_some(),
        });
        Ok(PullRequestView {
            number,
            title: request.title.clone(),
            body: Some(request.body.clone()),
            html_url: format!("https://github.com/{repository}/pull/{number}"),
            head_ref: request.head.clone(),
            base_ref: request.base.clone(),
            ..PullRequestView::default()
        })
    }

    async fn update_pull_request(
        &self,
        _repository: &RepositoryRef,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequestView, AutomationError> {
        let mut state = self.state();
        state.pull_requests_updated.push((number, update.clone()));
        let existing = state
            .open_pull_requests
            .iter()
            .find(|pull| pull.number == number)
            .cloned()
            .unwrap_or_default();
        Ok(PullRequestView {
            number,
            title: update.title.clone().unwrap_or(existing.title),
            body: update.body.clone().or(existing.body),
            ..existing
        })
    }

    async fn create_release(
        &self,
        _repository: &RepositoryRef,
        release: &NewRelease,
    ) -> Result<ReleaseView, AutomationError> {
        let mut state = self.state();
        state.releases.push(release.clone());
        Ok(ReleaseView {
            id: u64::try_from(state.releases.len()).unwrap_or_default(),
            tag_name: release.tag_name.clone(),
            name: Some(release.name.clone()),
        })
    }

    async fn compare_commits(
        &self,
        repository: &RepositoryRef,
        _base: &str,
        _head: &str,
    ) -> Result<CommitComparison, AutomationError> {
        Ok(self
            .state()
            .comparisons
            .get(repository.name().as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn open_pull_requests(
        &self,
        _repository: &RepositoryRef,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequestView>, AutomationError> {
        Ok(self
            .state()
            .open_pull_requests
            .iter()
            .filter(|pull| pull.head_ref == head && pull.base_ref == base)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GitDataGateway for FakePlatforms {
    async fn git_commit(
        &self,
        _repository: &RepositoryRef,
        sha: &str,
    ) -> Result<GitCommit, AutomationError> {
        Ok(GitCommit {
            sha: sha.to_owned(),
            message: format!("commit {sha}"),
            tree_sha: format!("tree-{sha}"),
            parents: vec![format!("{sha}-parent")],
            author: None,
        })
    }

    async fn create_git_commit(
        &self,
        _repository: &RepositoryRef,
        commit: &NewGitCommit,
    ) -> Result<GitCommit, AutomationError> {
        Ok(GitCommit {
            sha: format!("commit-{}", commit.tree),
            message: commit.message.clone(),
            tree_sha: commit.tree.clone(),
            parents: commit.parents.clone(),
            author: commit.author.clone(),
        })
    }

    async fn create_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), AutomationError> {
        self.update_ref(repository, branch, sha, false).await
    }

    async fn update_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
        _force: bool,
    ) -> Result<(), AutomationError> {
        let mut state = self.state();
        state.ref_updates.push((branch.to_owned(), sha.to_owned()));
        state.branches.insert(
            branch_key(repository, branch),
            BranchView {
                name: branch.to_owned(),
                sha: sha.to_owned(),
            },
        );
        Ok(())
    }

    async fn delete_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
    ) -> Result<(), AutomationError> {
        self.state().branches.remove(&branch_key(repository, branch));
        Ok(())
    }

    async fn merge(
        &self,
        _repository: &RepositoryRef,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<MergeOutcome, AutomationError> {
        Ok(MergeOutcome::Merged(GitCommit {
            sha: format!("merge-{head}"),
            message: message.to_owned(),
            tree_sha: format!("tree-{head}"),
            parents: vec![base.to_owned(), head.to_owned()],
            author: None,
        }))
    }
}

#[async_trait]
impl TrackerGateway for FakePlatforms {
    async fn issue(&self, key: &str) -> Result<Option<IssueView>, AutomationError> {
        Ok(self.state().issues.get(key).cloned())
    }

    async fn set_issue_status(&self, issue_id: &str, status: &str) -> Result<(), AutomationError> {
        let mut state = self.state();
        state
            .status_changes
            .push((issue_id.to_owned(), status.to_owned()));
        if let Some(issue) = state.issues.values_mut().find(|issue| issue.id == issue_id) {
            issue.status = status.to_owned();
        }
        Ok(())
    }

    async fn linked_pull_request_numbers(
        &self,
        issue_id: &str,
    ) -> Result<Vec<u64>, AutomationError> {
        Ok(self
            .state()
            .linked_pull_requests
            .get(issue_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ChatGateway for FakePlatforms {
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), AutomationError> {
        self.state()
            .messages
            .push((user_id.to_owned(), text.to_owned()));
        Ok(())
    }
}

#[async_trait]
impl CredentialResolver for FakePlatforms {
    async fn resolve(&self, lookup: &str) -> Result<Credentials, AutomationError> {
        self.state()
            .credentials
            .get(lookup)
            .cloned()
            .ok_or_else(|| AutomationError::Credentials {
                message: format!("Could not get credentials for the user {lookup}"),
            })
    }
}
