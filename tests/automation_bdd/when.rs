//! When steps: deliver an event to the router and run its handler.

use rstest_bdd_macros::when;
use serde_json::Value;
use switchyard::{AutomationSettings, dispatch, route};

use crate::automation_bdd_state::{
    AutomationState, REPOSITORY, ensure_runtime, invocation_time,
};
use crate::support::{check_suite_payload, dispatch_payload, pull_request_payload};

fn deliver(automation_state: &AutomationState, event_name: &str, payload: &Value) {
    let runtime = ensure_runtime(&automation_state.runtime)
        .unwrap_or_else(|error| panic!("runtime should start: {error}"));
    let platforms = automation_state.platforms();
    let settings = AutomationSettings::default();
    let context = platforms.context(&settings).at(invocation_time());

    let result = route(event_name, payload)
        .and_then(|event| runtime.block_on(dispatch(&context, event)));
    match result {
        Ok(effects) => automation_state.effects.set(effects),
        Err(error) => automation_state.error.set(error),
    }
}

#[when("the check suite {check} completes with {conclusion}")]
fn check_suite_completes(automation_state: &AutomationState, check: String, conclusion: String) {
    let number = automation_state.pull_request().number;
    let payload = check_suite_payload(REPOSITORY, &check, &conclusion, None, number);
    deliver(automation_state, "check_suite", &payload);
}

#[when("commit {sha} finishes the check suite {check} with {conclusion} while attached to pull request {number:u64}")]
fn check_suite_completes_for_commit(
    automation_state: &AutomationState,
    sha: String,
    check: String,
    conclusion: String,
    number: u64,
) {
    let payload = check_suite_payload(REPOSITORY, &check, &conclusion, Some(&sha), number);
    deliver(automation_state, "check_suite", &payload);
}

#[when("the pull request is closed")]
fn pull_request_closed(automation_state: &AutomationState) {
    let payload =
        pull_request_payload("closed", REPOSITORY, &automation_state.pull_request());
    deliver(automation_state, "pull_request", &payload);
}

#[when("the pull request is marked ready for review")]
fn pull_request_ready(automation_state: &AutomationState) {
    let payload =
        pull_request_payload("ready_for_review", REPOSITORY, &automation_state.pull_request());
    deliver(automation_state, "pull_request", &payload);
}

#[when("the pull request is synchronized")]
fn pull_request_synchronized(automation_state: &AutomationState) {
    let payload =
        pull_request_payload("synchronize", REPOSITORY, &automation_state.pull_request());
    deliver(automation_state, "pull_request", &payload);
}

#[when("{email} asks for a pull request for {key}")]
fn issue_pull_request_requested(automation_state: &AutomationState, email: String, key: String) {
    let payload = dispatch_payload("createPullRequestForJiraIssue", &email, &key);
    deliver(automation_state, "workflow_dispatch", &payload);
}

#[when("{email} asks for a release pull request")]
fn release_pull_request_requested(automation_state: &AutomationState, email: String) {
    let payload = dispatch_payload("createReleasePullRequest", &email, REPOSITORY);
    deliver(automation_state, "workflow_dispatch", &payload);
}
