//! Rebase a branch onto another using only the Git data API.
//!
//! Each commit unique to the head branch is replayed onto the new base by
//! merging it into a temporary ref whose tip is a sibling of the commit's
//! original parent, then recording the merged tree as a single-parent
//! commit. The head ref is force-updated only once every commit has been
//! replayed.

use tracing::{debug, error, info, warn};

use crate::error::AutomationError;
use crate::github::gateway::{GitDataGateway, HostingGateway};
use crate::github::locator::RepositoryRef;
use crate::github::models::{MergeOutcome, NewGitCommit};

/// Result of a rebase attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseOutcome {
    /// The head branch already contains the base.
    UpToDate,
    /// The head branch was rewritten onto the base.
    Rebased {
        /// Number of commits replayed.
        commits: usize,
    },
    /// Replaying the given commit conflicted; the head branch is untouched.
    Conflict {
        /// SHA of the conflicting commit.
        sha: String,
    },
    /// The comparison listed fewer commits than the head is ahead by, so a
    /// replay would drop commits; the head branch is untouched.
    Truncated {
        /// Commits listed by the comparison, merge commits included.
        listed: u64,
        /// Commits the head branch is ahead of its base.
        ahead_by: u64,
    },
}

enum Replay {
    Finished { tip: String, commits: usize },
    Conflict { sha: String },
}

/// Rebase `head` onto `base` in `repository`.
///
/// # Errors
///
/// Returns an error when the base branch is missing or a Git data call
/// fails. The temporary ref is removed on every path.
pub async fn rebase_branch(
    hosting: &dyn HostingGateway,
    git: &dyn GitDataGateway,
    repository: &RepositoryRef,
    head: &str,
    base: &str,
) -> Result<RebaseOutcome, AutomationError> {
    let comparison = hosting.compare_commits(repository, base, head).await?;
    if comparison.behind_by == 0 {
        debug!(%repository, head, base, "branch already contains its base");
        return Ok(RebaseOutcome::UpToDate);
    }

    let listed = u64::try_from(comparison.commits.len()).unwrap_or(u64::MAX);
    if listed < comparison.ahead_by {
        error!(
            %repository,
            head,
            base,
            listed,
            ahead_by = comparison.ahead_by,
            "comparison does not list every head commit - refusing to rebase"
        );
        return Ok(RebaseOutcome::Truncated {
            listed,
            ahead_by: comparison.ahead_by,
        });
    }

    let base_branch = hosting
        .branch(repository, base)
        .await?
        .ok_or_else(|| AutomationError::NotFound {
            message: format!("branch '{base}' in {repository}"),
        })?;

    let temporary = format!("{head}-rebase-{}", short_sha(&base_branch.sha));
    git.create_ref(repository, &temporary, &base_branch.sha).await?;

    let shas: Vec<String> = comparison
        .commits
        .iter()
        .filter(|commit| commit.parents.len() <= 1)
        .map(|commit| commit.sha.clone())
        .collect();
    let replayed = replay(git, repository, &temporary, &base_branch.sha, &shas).await;

    let outcome = match replayed {
        Ok(Replay::Finished { tip, commits }) => {
            match git.update_ref(repository, head, &tip, true).await {
                Ok(()) => Ok(RebaseOutcome::Rebased { commits }),
                Err(error) => Err(error),
            }
        }
        Ok(Replay::Conflict { sha }) => Ok(RebaseOutcome::Conflict { sha }),
        Err(error) => Err(error),
    };

    if let Err(error) = git.delete_ref(repository, &temporary).await {
        warn!(%repository, branch = %temporary, %error, "could not delete temporary branch");
    }

    if let Ok(RebaseOutcome::Rebased { commits }) = &outcome {
        info!(%repository, head, base, commits, "rebased branch");
    }
    outcome
}

async fn replay(
    git: &dyn GitDataGateway,
    repository: &RepositoryRef,
    temporary: &str,
    base_sha: &str,
    shas: &[String],
) -> Result<Replay, AutomationError> {
    let mut tip = base_sha.to_owned();
    let mut tip_tree = git.git_commit(repository, base_sha).await?.tree_sha;
    let mut commits = 0;

    for sha in shas {
        let original = git.git_commit(repository, sha).await?;
        let parent = original.parents.first().cloned().unwrap_or_default();

        let sibling = git
            .create_git_commit(
                repository,
                &NewGitCommit {
                    message: "sibling of tip".to_owned(),
                    tree: tip_tree.clone(),
                    parents: vec![parent],
                    author: None,
                },
            )
            .await?;
        git.update_ref(repository, temporary, &sibling.sha, true)
            .await?;

        let merged = match git
            .merge(repository, temporary, sha, &format!("Replay {sha}"))
            .await?
        {
            MergeOutcome::Merged(merged) => merged,
            MergeOutcome::NothingToMerge => {
                debug!(%repository, sha = %sha, "commit already applied; skipping");
                git.update_ref(repository, temporary, &tip, true).await?;
                continue;
            }
            MergeOutcome::Conflict => return Ok(Replay::Conflict { sha: sha.clone() }),
        };

        let replayed = git
            .create_git_commit(
                repository,
                &NewGitCommit {
                    message: original.message,
                    tree: merged.tree_sha.clone(),
                    parents: vec![tip],
                    author: original.author,
                },
            )
            .await?;
        git.update_ref(repository, temporary, &replayed.sha, true)
            .await?;

        tip = replayed.sha;
        tip_tree = merged.tree_sha;
        commits += 1;
    }

    Ok(Replay::Finished { tip, commits })
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
