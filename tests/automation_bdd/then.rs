//! Then steps: inspect what the handlers did to the fake platforms.

use rstest_bdd_macros::then;
use switchyard::AutomationSettings;

use crate::automation_bdd_state::AutomationState;

fn unquote(text: &str) -> &str {
    text.trim_matches('"')
}

#[then("the event is handled without error")]
fn handled(automation_state: &AutomationState) {
    let error = automation_state.error.get();
    assert!(error.is_none(), "unexpected error: {error:?}");
}

#[then("the event fails")]
fn failed(automation_state: &AutomationState) {
    assert!(automation_state.error.get().is_some(), "expected the handler to fail");
}

#[then("pull request {number:u64} is labelled {label}")]
fn labelled(automation_state: &AutomationState, number: u64, label: String) {
    assert_eq!(
        automation_state.platforms().labels_added(),
        vec![(number, vec![label])]
    );
}

#[then("no labels are added")]
fn no_labels(automation_state: &AutomationState) {
    assert!(automation_state.platforms().labels_added().is_empty());
}

#[then("{slack_id} receives a message containing {text}")]
fn message_received(automation_state: &AutomationState, slack_id: String, text: String) {
    let messages = automation_state.platforms().messages();
    let expected = unquote(&text);
    assert!(
        messages
            .iter()
            .any(|(user, body)| *user == slack_id && body.contains(expected)),
        "expected a message to {slack_id} containing {expected:?}, sent: {messages:?}"
    );
}

#[then("exactly one chat message is sent")]
fn one_message(automation_state: &AutomationState) {
    let messages = automation_state.platforms().messages();
    assert_eq!(messages.len(), 1, "sent: {messages:?}");
}

#[then("no chat messages are sent")]
fn no_messages(automation_state: &AutomationState) {
    let messages = automation_state.platforms().messages();
    assert!(messages.is_empty(), "unexpected messages: {messages:?}");
}

#[then("release {tag} named {name} is created from {target}")]
fn release_created(automation_state: &AutomationState, tag: String, name: String, target: String) {
    let releases = automation_state.platforms().releases();
    let [release] = releases.as_slice() else {
        panic!("expected exactly one release, got {releases:?}");
    };
    assert_eq!(release.tag_name, tag);
    assert_eq!(release.name, unquote(&name));
    assert_eq!(release.target_commitish, target);
    assert!(!release.draft, "releases are published immediately");
}

#[then("the release notes read {notes}")]
fn release_notes(automation_state: &AutomationState, notes: String) {
    let releases = automation_state.platforms().releases();
    let bodies: Vec<&str> = releases.iter().map(|release| release.body.as_str()).collect();
    assert_eq!(bodies, vec![unquote(&notes)]);
}

#[then("no release is created")]
fn no_release(automation_state: &AutomationState) {
    assert!(automation_state.platforms().releases().is_empty());
}

#[then("issue {key} moves to {status}")]
fn issue_moved(automation_state: &AutomationState, key: String, status: String) {
    assert_eq!(
        automation_state.platforms().status_changes(),
        vec![(key, status)]
    );
}

#[then("no issue status changes")]
fn no_status_changes(automation_state: &AutomationState) {
    assert!(automation_state.platforms().status_changes().is_empty());
}

#[then("a draft pull request is opened from {branch}")]
fn draft_opened(automation_state: &AutomationState, branch: String) {
    let created = automation_state.platforms().pull_requests_created();
    let [pull] = created.as_slice() else {
        panic!("expected exactly one pull request, got {created:?}");
    };
    assert_eq!(pull.request.head, branch);
    assert_eq!(pull.request.base, "develop");
    assert!(pull.request.draft, "issue pull requests start as drafts");
    assert!(pull.acting_as_user, "issue pull requests are opened as the assignee");
}

#[then("the branch is seeded with {path}")]
fn branch_seeded(automation_state: &AutomationState, path: String) {
    let branches = automation_state.platforms().branches_created();
    let paths: Vec<&str> = branches
        .iter()
        .map(|branch| branch.file_path.as_str())
        .collect();
    assert_eq!(paths, vec![path.as_str()]);
}

#[then("a draft release pull request titled {title} is opened")]
fn release_draft_opened(automation_state: &AutomationState, title: String) {
    let created = automation_state.platforms().pull_requests_created();
    let [pull] = created.as_slice() else {
        panic!("expected exactly one pull request, got {created:?}");
    };
    assert_eq!(pull.request.title, unquote(&title));
    assert_eq!(pull.request.head, AutomationSettings::default().release_branch());
    assert_eq!(pull.request.base, "master");
    assert!(pull.request.draft, "release pull requests start as drafts");
    assert!(!pull.acting_as_user, "release pull requests are opened by the automation");
}

#[then("no branch is created")]
fn no_branch(automation_state: &AutomationState) {
    let platforms = automation_state.platforms();
    assert!(platforms.branches_created().is_empty());
    assert!(platforms.ref_updates().is_empty());
}

#[then("no branch is moved")]
fn no_branch_moved(automation_state: &AutomationState) {
    let updates = automation_state.platforms().ref_updates();
    assert!(updates.is_empty(), "unexpected ref updates: {updates:?}");
}

#[then("branch {name} points at {sha}")]
fn branch_points_at(automation_state: &AutomationState, name: String, sha: String) {
    let updates = automation_state.platforms().ref_updates();
    let last = updates
        .iter()
        .rev()
        .find(|(branch, _)| *branch == name)
        .map(|(_, target)| target.as_str());
    assert_eq!(last, Some(sha.as_str()), "ref updates: {updates:?}");
}

#[then("no pull request is created")]
fn no_pull_request(automation_state: &AutomationState) {
    assert!(automation_state.platforms().pull_requests_created().is_empty());
}

#[then("pull request {number:u64} is assigned to {login}")]
fn assigned(automation_state: &AutomationState, number: u64, login: String) {
    assert_eq!(
        automation_state.platforms().owners_assigned(),
        vec![(number, vec![login])]
    );
}

#[then("the release branch points at {sha}")]
fn release_branch_moved(automation_state: &AutomationState, sha: String) {
    let release_branch = AutomationSettings::default().release_branch();
    assert_eq!(
        automation_state.platforms().ref_updates(),
        vec![(release_branch, sha)]
    );
}

#[then("pull request {number:u64} carries the labels {labels}")]
fn labels_set(automation_state: &AutomationState, number: u64, labels: String) {
    let expected: Vec<String> = labels.split(", ").map(ToOwned::to_owned).collect();
    assert_eq!(
        automation_state.platforms().labels_set(),
        vec![(number, expected)]
    );
}

#[then("release pull request {number:u64} is refreshed")]
fn release_refreshed(automation_state: &AutomationState, number: u64) {
    let updates = automation_state.platforms().pull_requests_updated();
    let [(updated, update)] = updates.as_slice() else {
        panic!("expected exactly one update, got {updates:?}");
    };
    assert_eq!(*updated, number);
    let body = update.body.as_deref().unwrap_or_default();
    assert!(body.contains("- Change number 1 (@dev)"), "body: {body}");
    assert!(automation_state.platforms().pull_requests_created().is_empty());
}
