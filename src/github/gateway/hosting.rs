//! Octocrab implementation of the hosting gateway.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use octocrab::Octocrab;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AutomationError;
use crate::github::locator::{PersonalAccessToken, RepositoryRef};
use crate::github::models::{
    ApiBranch, ApiCommit, ApiComparison, ApiLabel, ApiPullRequest, ApiRepository, BranchView,
    CommitComparison, CommitView, NewBranch, NewPullRequest, NewRelease, PullRequestUpdate,
    PullRequestView, ReleaseView, RepositoryView,
};

use super::client::build_octocrab_client;
use super::error_mapping::{found, map_octocrab_error};
use super::{GitDataGateway, HostingGateway};

/// Default public GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Octocrab-backed gateway for both hosting and Git data operations.
pub struct OctocrabHostingGateway {
    pub(super) client: Octocrab,
    api_base: String,
}

impl OctocrabHostingGateway {
    /// Builds a gateway authenticated with `token` against `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError::Configuration` when the base URI cannot be
    /// parsed or `AutomationError::Api` when Octocrab fails to construct a
    /// client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, AutomationError> {
        let client = build_octocrab_client(token, api_base)?;
        Ok(Self {
            client,
            api_base: api_base.to_owned(),
        })
    }

    async fn post_json<B, R>(
        &self,
        operation: &str,
        route: String,
        body: &B,
    ) -> Result<R, AutomationError>
    where
        B: Serialize + Sync + ?Sized,
        R: octocrab::FromResponse,
    {
        self.client
            .post(route, Some(body))
            .await
            .map_err(|error| map_octocrab_error(operation, &error))
    }
}

#[derive(Serialize)]
struct LabelsBody<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct ContentsBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
}

#[async_trait]
impl HostingGateway for OctocrabHostingGateway {
    async fn pull_request(
        &self,
        repository: &RepositoryRef,
        number: u64,
    ) -> Result<Option<PullRequestView>, AutomationError> {
        let route = repository.api_path_for(&format!("pulls/{number}"));
        let result = self.client.get::<ApiPullRequest, _, _>(route, None::<&()>).await;
        found("pull request", result).map(|maybe| maybe.map(PullRequestView::from))
    }

    async fn commit(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<Option<CommitView>, AutomationError> {
        let route = repository.api_path_for(&format!("commits/{sha}"));
        let result = self.client.get::<ApiCommit, _, _>(route, None::<&()>).await;
        found("commit", result).map(|maybe| maybe.map(CommitView::from))
    }

    async fn repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Option<RepositoryView>, AutomationError> {
        let result = self
            .client
            .get::<ApiRepository, _, _>(repository.api_path(), None::<&()>)
            .await;
        found("repository", result).map(|maybe| maybe.map(RepositoryView::from))
    }

    async fn branch(
        &self,
        repository: &RepositoryRef,
        name: &str,
    ) -> Result<Option<BranchView>, AutomationError> {
        let route = repository.api_path_for(&format!("branches/{name}"));
        let result = self.client.get::<ApiBranch, _, _>(route, None::<&()>).await;
        found("branch", result).map(|maybe| maybe.map(BranchView::from))
    }

    async fn add_labels(
        &self,
        repository: &RepositoryRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), AutomationError> {
        let route = repository.api_path_for(&format!("issues/{number}/labels"));
        let _labels: Vec<ApiLabel> = self
            .post_json("add labels", route, &LabelsBody { labels })
            .await?;
        Ok(())
    }

    async fn set_labels(
        &self,
        repository: &RepositoryRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), AutomationError> {
        let route = repository.api_path_for(&format!("issues/{number}/labels"));
        let _labels: Vec<ApiLabel> = self
            .client
            .put(route, Some(&LabelsBody { labels }))
            .await
            .map_err(|error| map_octocrab_error("set labels", &error))?;
        Ok(())
    }

    async fn assign_owners(
        &self,
        repository: &RepositoryRef,
        number: u64,
        logins: &[String],
    ) -> Result<(), AutomationError> {
        let route = repository.api_path_for(&format!("issues/{number}/assignees"));
        let _issue: Value = self
            .post_json("assign owners", route, &json!({ "assignees": logins }))
            .await?;
        Ok(())
    }

    async fn request_reviewers(
        &self,
        repository: &RepositoryRef,
        number: u64,
        logins: &[String],
    ) -> Result<(), AutomationError> {
        let author = self
            .pull_request(repository, number)
            .await?
            .and_then(|pull| pull.author);
        let reviewers: Vec<&String> = logins
            .iter()
            .filter(|login| author.as_deref() != Some(login.as_str()))
            .collect();
        if reviewers.is_empty() {
            return Ok(());
        }

        let route = repository.api_path_for(&format!("pulls/{number}/requested_reviewers"));
        let _pull: Value = self
            .post_json("request reviewers", route, &json!({ "reviewers": reviewers }))
            .await?;
        Ok(())
    }

    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &NewBranch,
    ) -> Result<BranchView, AutomationError> {
        let base = self
            .branch(repository, &branch.base)
            .await?
            .ok_or_else(|| AutomationError::NotFound {
                message: format!("branch '{}' in {repository}", branch.base),
            })?;

        self.create_ref(repository, &branch.name, &base.sha).await?;

        let route = repository.api_path_for(&format!("contents/{}", branch.file_path));
        let body = ContentsBody {
            message: &branch.commit_message,
            content: STANDARD.encode(branch.file_content.as_bytes()),
            branch: &branch.name,
        };
        let _contents: Value = self
            .client
            .put(route, Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create seed file", &error))?;

        self.branch(repository, &branch.name)
            .await?
            .ok_or_else(|| AutomationError::NotFound {
                message: format!("branch '{}' in {repository}", branch.name),
            })
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &NewPullRequest,
        acting_as: Option<PersonalAccessToken>,
    ) -> Result<PullRequestView, AutomationError> {
        let route = repository.api_path_for("pulls");
        let created: ApiPullRequest = match acting_as {
            Some(token) => build_octocrab_client(&token, &self.api_base)?
                .post(route, Some(request))
                .await
                .map_err(|error| map_octocrab_error("create pull request", &error))?,
            None => self.post_json("create pull request", route, request).await?,
        };
        Ok(created.into())
    }

    async fn update_pull_request(
        &self,
        repository: &RepositoryRef,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequestView, AutomationError> {
        let route = repository.api_path_for(&format!("pulls/{number}"));
        self.client
            .patch::<ApiPullRequest, _, _>(route, Some(update))
            .await
            .map(PullRequestView::from)
            .map_err(|error| map_octocrab_error("update pull request", &error))
    }

    async fn create_release(
        &self,
        repository: &RepositoryRef,
        release: &NewRelease,
    ) -> Result<ReleaseView, AutomationError> {
        let route = repository.api_path_for("releases");
        self.post_json("create release", route, release).await
    }

    async fn compare_commits(
        &self,
        repository: &RepositoryRef,
        base: &str,
        head: &str,
    ) -> Result<CommitComparison, AutomationError> {
        let route = repository.api_path_for(&format!("compare/{base}...{head}"));
        self.client
            .get::<ApiComparison, _, _>(route, None::<&()>)
            .await
            .map(CommitComparison::from)
            .map_err(|error| map_octocrab_error("compare commits", &error))
    }

    async fn open_pull_requests(
        &self,
        repository: &RepositoryRef,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequestView>, AutomationError> {
        let head_filter = format!("{}:{head}", repository.owner().as_str());
        let query = [
            ("state", "open"),
            ("head", head_filter.as_str()),
            ("base", base),
        ];
        let pulls: Vec<ApiPullRequest> = self
            .client
            .get(repository.api_path_for("pulls"), Some(&query))
            .await
            .map_err(|error| map_octocrab_error("list pull requests", &error))?;
        Ok(pulls.into_iter().map(PullRequestView::from).collect())
    }
}
