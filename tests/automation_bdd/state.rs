//! Scenario state for automation behavioural tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use switchyard::github::models::PullRequestView;
use switchyard::jira::IssueView;
use switchyard::test_support::FakePlatforms;
use switchyard::{AutomationError, Effect};

pub(crate) use crate::support::runtime::{SharedRuntime, ensure_runtime};

/// Repository every scenario works in.
pub(crate) const REPOSITORY: &str = "actions";

/// Time every event is handled at: day 12 of the year, so releases are
/// named "Lively Lemur".
pub(crate) fn invocation_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 12, 4, 26, 0)
        .single()
        .unwrap_or_else(|| panic!("invocation time should be valid"))
}

#[derive(ScenarioState, Default)]
pub(crate) struct AutomationState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) platforms: Slot<Arc<FakePlatforms>>,
    pub(crate) pull_request: Slot<PullRequestView>,
    pub(crate) issue: Slot<IssueView>,
    pub(crate) effects: Slot<Vec<Effect>>,
    pub(crate) error: Slot<AutomationError>,
}

impl AutomationState {
    /// The fake platforms, created on first use.
    pub(crate) fn platforms(&self) -> Arc<FakePlatforms> {
        if let Some(platforms) = self.platforms.get() {
            return platforms;
        }
        let platforms = Arc::new(FakePlatforms::new());
        self.platforms.set(Arc::clone(&platforms));
        platforms
    }

    /// The pull request seeded by an earlier step.
    pub(crate) fn pull_request(&self) -> PullRequestView {
        self.pull_request
            .get()
            .unwrap_or_else(|| panic!("no pull request was seeded"))
    }

    /// Stores `pull` and seeds it into the fake hosting platform.
    pub(crate) fn save_pull_request(&self, pull: PullRequestView) {
        self.platforms().add_pull_request(REPOSITORY, pull.clone());
        self.pull_request.set(pull);
    }

    /// The issue seeded by an earlier step.
    pub(crate) fn issue(&self) -> IssueView {
        self.issue
            .get()
            .unwrap_or_else(|| panic!("no issue was seeded"))
    }

    /// Stores `issue` and seeds it into the fake tracker.
    pub(crate) fn save_issue(&self, issue: IssueView) {
        self.platforms().add_issue(issue.clone());
        self.issue.set(issue);
    }
}
