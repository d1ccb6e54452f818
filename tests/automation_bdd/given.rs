//! Given steps: seed the fake platforms.

use rstest_bdd_macros::given;
use switchyard::credentials::Credentials;
use switchyard::github::models::{
    BranchView, CommitComparison, CommitView, ComparedCommit, PullRequestView, RepositoryView,
};
use switchyard::jira::{IssueAssignee, IssueView};
use switchyard::AutomationSettings;

use crate::automation_bdd_state::{AutomationState, REPOSITORY};
use crate::support::OWNER;

#[given("a pull request {number:u64} titled {title}")]
fn pull_request(automation_state: &AutomationState, number: u64, title: String) {
    automation_state.save_pull_request(PullRequestView {
        number,
        title: title.trim_matches('"').to_owned(),
        html_url: format!("https://github.com/{OWNER}/{REPOSITORY}/pull/{number}"),
        head_ref: "feature".to_owned(),
        base_ref: "develop".to_owned(),
        author: Some("dev".to_owned()),
        ..PullRequestView::default()
    });
}

#[given("it was merged from {head} into {base}")]
fn merged(automation_state: &AutomationState, head: String, base: String) {
    let pull = automation_state.pull_request();
    automation_state.save_pull_request(PullRequestView {
        merged: true,
        head_ref: head,
        base_ref: base,
        ..pull
    });
}

#[given("it is open from {head} into {base}")]
fn open_from(automation_state: &AutomationState, head: String, base: String) {
    let pull = automation_state.pull_request();
    automation_state.save_pull_request(PullRequestView {
        merged: false,
        head_ref: head,
        base_ref: base,
        ..pull
    });
}

#[given("commit {sha} says {message}")]
fn commit(automation_state: &AutomationState, sha: String, message: String) {
    automation_state.platforms().add_commit(CommitView {
        sha,
        message: message.trim_matches('"').to_owned(),
    });
}

#[given("the release branch was merged into {base}")]
fn merged_release(automation_state: &AutomationState, base: String) {
    merged(
        automation_state,
        AutomationSettings::default().release_branch(),
        base,
    );
}

#[given("its body lists the release notes {notes}")]
fn release_notes(automation_state: &AutomationState, notes: String) {
    let pull = automation_state.pull_request();
    let body = format!("## {}\n{}", pull.title, notes.trim_matches('"'));
    automation_state.save_pull_request(PullRequestView {
        body: Some(body),
        ..pull
    });
}

#[given("issue {key} about {summary} is assigned to {email}")]
fn assigned_issue(automation_state: &AutomationState, key: String, summary: String, email: String) {
    automation_state.save_issue(IssueView {
        id: key.clone(),
        key,
        summary: summary.trim_matches('"').to_owned(),
        status: "In Progress".to_owned(),
        issue_type: "Story".to_owned(),
        assignee: Some(IssueAssignee {
            email: Some(email),
            display_name: None,
        }),
        ..IssueView::default()
    });
}

#[given("the issue has status {status}")]
fn issue_status(automation_state: &AutomationState, status: String) {
    let issue = automation_state.issue();
    automation_state.save_issue(IssueView { status, ..issue });
}

#[given("the issue has subtasks")]
fn issue_subtasks(automation_state: &AutomationState) {
    let issue = automation_state.issue();
    let subtask = format!("{}-SUB", issue.key);
    automation_state.save_issue(IssueView {
        subtasks: vec![subtask],
        ..issue
    });
}

#[given("the issue already has pull request {number:u64} open")]
fn linked_pull_request(automation_state: &AutomationState, number: u64) {
    let issue = automation_state.issue();
    automation_state
        .platforms()
        .link_pull_requests(&issue.id, vec![number]);
}

#[given("the issue belongs to the repository")]
fn issue_repository(automation_state: &AutomationState) {
    let issue = automation_state.issue();
    automation_state.platforms().add_repository(RepositoryView {
        name: REPOSITORY.to_owned(),
        default_branch: "develop".to_owned(),
    });
    automation_state.save_issue(IssueView {
        repository: Some(REPOSITORY.to_owned()),
        ..issue
    });
}

#[given("{email} has chat id {slack_id} and hosting login {login}")]
fn credentials(automation_state: &AutomationState, email: String, slack_id: String, login: String) {
    automation_state.platforms().add_credentials(
        &email,
        Credentials {
            email: email.clone(),
            slack_id,
            github_username: login,
            github_token: "ghp_user_token".to_owned(),
            jira_account_id: None,
        },
    );
}

#[given("the repository has a {name} branch at {sha}")]
fn branch(automation_state: &AutomationState, name: String, sha: String) {
    automation_state
        .platforms()
        .add_branch(REPOSITORY, BranchView { name, sha });
}

#[given("develop is ahead of master by {count:u64} commits")]
fn develop_ahead(automation_state: &AutomationState, count: u64) {
    let commits = (1..=count)
        .map(|index| ComparedCommit {
            sha: format!("sha-{index}"),
            message: format!("Change number {index}\n\nDetails"),
            author_login: Some("dev".to_owned()),
            author_name: None,
            parents: vec![format!("parent-{index}")],
        })
        .collect();
    automation_state.platforms().set_comparison(
        REPOSITORY,
        CommitComparison {
            ahead_by: count,
            behind_by: 0,
            total_commits: count,
            commits,
        },
    );
}

#[given("release pull request {number:u64} is already open")]
fn open_release(automation_state: &AutomationState, number: u64) {
    automation_state
        .platforms()
        .add_open_pull_request(PullRequestView {
            number,
            title: "Release Candidate 2020-01-01-0000 (Old Owl)".to_owned(),
            head_ref: AutomationSettings::default().release_branch(),
            base_ref: "master".to_owned(),
            labels: vec!["release".to_owned()],
            ..PullRequestView::default()
        });
}

#[given("pull request creation fails")]
fn pull_request_creation_fails(automation_state: &AutomationState) {
    automation_state.platforms().fail_pull_request_creation();
}

#[given("the epic is {ahead:u64} commits ahead of its base with {listed:u64} listed")]
fn epic_comparison(automation_state: &AutomationState, ahead: u64, listed: u64) {
    let commits = (1..=listed)
        .map(|index| ComparedCommit {
            sha: format!("epic-{index}"),
            message: format!("Epic change {index}"),
            author_login: Some("dev".to_owned()),
            author_name: None,
            parents: vec!["old-base".to_owned()],
        })
        .collect();
    automation_state.platforms().set_comparison(
        REPOSITORY,
        CommitComparison {
            ahead_by: ahead,
            behind_by: 1,
            total_commits: ahead,
            commits,
        },
    );
}
