//! Git data operations on the Octocrab gateway.
//!
//! Merges and ref deletion need the raw status code (204 and 409 are
//! meaningful outcomes), so they go through Octocrab's raw request methods.

use async_trait::async_trait;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::AutomationError;
use crate::github::locator::RepositoryRef;
use crate::github::models::{ApiCommit, ApiGitCommit, GitCommit, MergeOutcome, NewGitCommit};

use super::client::route_uri;
use super::error_mapping::{map_http_error, map_octocrab_error, response_message};
use super::{GitDataGateway, OctocrabHostingGateway};

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Serialize)]
struct MergeBody<'a> {
    base: &'a str,
    head: &'a str,
    commit_message: &'a str,
}

#[async_trait]
impl GitDataGateway for OctocrabHostingGateway {
    async fn git_commit(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<GitCommit, AutomationError> {
        let route = repository.api_path_for(&format!("git/commits/{sha}"));
        self.client
            .get::<ApiGitCommit, _, _>(route, None::<&()>)
            .await
            .map(GitCommit::from)
            .map_err(|error| map_octocrab_error("fetch git commit", &error))
    }

    async fn create_git_commit(
        &self,
        repository: &RepositoryRef,
        commit: &NewGitCommit,
    ) -> Result<GitCommit, AutomationError> {
        let route = repository.api_path_for("git/commits");
        self.client
            .post::<_, ApiGitCommit>(route, Some(commit))
            .await
            .map(GitCommit::from)
            .map_err(|error| map_octocrab_error("create git commit", &error))
    }

    async fn create_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), AutomationError> {
        let body = CreateRefBody {
            reference: format!("refs/heads/{branch}"),
            sha,
        };
        let _reference: Value = self
            .client
            .post(repository.api_path_for("git/refs"), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create ref", &error))?;
        Ok(())
    }

    async fn update_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), AutomationError> {
        let route = repository.api_path_for(&format!("git/refs/heads/{branch}"));
        let _reference: Value = self
            .client
            .patch(route, Some(&UpdateRefBody { sha, force }))
            .await
            .map_err(|error| map_octocrab_error("update ref", &error))?;
        Ok(())
    }

    async fn delete_ref(
        &self,
        repository: &RepositoryRef,
        branch: &str,
    ) -> Result<(), AutomationError> {
        let uri = route_uri(&repository.api_path_for(&format!("git/refs/heads/{branch}")))?;
        let response = self
            .client
            ._delete(uri, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("delete ref", &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = self.client.body_to_string(response).await.unwrap_or_default();
        Err(map_http_error(
            "delete ref",
            status,
            response_message(&body),
        ))
    }

    async fn merge(
        &self,
        repository: &RepositoryRef,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<MergeOutcome, AutomationError> {
        let uri = route_uri(&repository.api_path_for("merges"))?;
        let body = MergeBody {
            base,
            head,
            commit_message: message,
        };
        let response = self
            .client
            ._post(uri, Some(&body))
            .await
            .map_err(|error| map_octocrab_error("merge", &error))?;

        let status = response.status();
        match status {
            StatusCode::NO_CONTENT => Ok(MergeOutcome::NothingToMerge),
            StatusCode::CONFLICT => Ok(MergeOutcome::Conflict),
            _ => {
                let text = self
                    .client
                    .body_to_string(response)
                    .await
                    .map_err(|error| map_octocrab_error("read merge response", &error))?;
                if !status.is_success() {
                    return Err(map_http_error("merge", status, response_message(&text)));
                }
                let commit: ApiCommit = serde_json::from_str(&text).map_err(|error| {
                    AutomationError::api(format!("merge response could not be parsed: {error}"))
                })?;
                Ok(MergeOutcome::Merged(commit.into()))
            }
        }
    }
}
