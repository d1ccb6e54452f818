//! Automation settings threaded into every handler and decision function.
//!
//! These values used to be module-level constants: label names, reserved
//! branch names, tracker statuses and the identity the automation writes as.
//! They are built once from [`crate::SwitchyardConfig`] and passed explicitly.

use crate::template::DEFAULT_PULL_REQUEST_TEMPLATE;

/// Label names applied by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNames {
    /// Added to a pull request whose check suite failed.
    pub has_issues: String,
    /// Added to a pull request whose work has started.
    pub in_progress: String,
    /// Added to a pull request that is ready for review.
    pub please_review: String,
    /// Added to release candidate pull requests.
    pub release: String,
}

impl Default for LabelNames {
    fn default() -> Self {
        Self {
            has_issues: "has-issues".to_owned(),
            in_progress: "in-progress".to_owned(),
            please_review: "please-review".to_owned(),
            release: "release".to_owned(),
        }
    }
}

/// Tracker status names used for transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNames {
    /// Status an issue moves to once its pull request is ready for review.
    pub tech_review: String,
    /// Terminal status an issue moves to once its pull request is merged.
    pub validated: String,
}

impl Default for StatusNames {
    fn default() -> Self {
        Self {
            tech_review: "Tech Review".to_owned(),
            validated: "Validated".to_owned(),
        }
    }
}

/// Configuration value consumed by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationSettings {
    /// Organisation that owns the repositories handled by manual triggers.
    pub organization: String,
    /// Hosting username the automation writes as. Notifications resolving to
    /// this identity are never sent.
    pub github_write_user: String,
    /// Integration branch that release candidates are cut from.
    pub develop_branch: String,
    /// Production branch names, in order of preference.
    pub production_branches: Vec<String>,
    /// Label names.
    pub labels: LabelNames,
    /// Tracker status names.
    pub statuses: StatusNames,
    /// Check names whose successful runs never produce a notification.
    /// Matched exactly and case-sensitively.
    pub quiet_checks: Vec<String>,
    /// Title prefix marking a pull request as an epic.
    pub epic_title_prefix: String,
    /// Host name of the tracker, used to build issue links.
    pub jira_host: String,
    /// Jinja template for the body of issue pull requests.
    pub pull_request_template: String,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            organization: "octokit".to_owned(),
            github_write_user: "sr-devops".to_owned(),
            develop_branch: "develop".to_owned(),
            production_branches: vec!["master".to_owned(), "main".to_owned()],
            labels: LabelNames::default(),
            statuses: StatusNames::default(),
            quiet_checks: vec!["GitGuardian".to_owned(), "Codecov".to_owned()],
            epic_title_prefix: "[Epic] ".to_owned(),
            jira_host: "example.atlassian.net".to_owned(),
            pull_request_template: DEFAULT_PULL_REQUEST_TEMPLATE.to_owned(),
        }
    }
}

impl AutomationSettings {
    /// The reserved branch release candidates are built on.
    #[must_use]
    pub fn release_branch(&self) -> String {
        format!("{}/release-candidate", self.github_write_user)
    }

    /// Returns true when successful runs of `check_name` should stay silent.
    #[must_use]
    pub fn is_quiet_check(&self, check_name: &str) -> bool {
        self.quiet_checks.iter().any(|quiet| quiet == check_name)
    }

    /// Browser URL of a tracker issue.
    #[must_use]
    pub fn issue_url(&self, issue_key: &str) -> String {
        format!("https://{}/browse/{issue_key}", self.jira_host)
    }

    /// Browser URL of a pull request in the organisation.
    #[must_use]
    pub fn pull_request_url(&self, repository: &str, number: u64) -> String {
        format!(
            "https://github.com/{}/{repository}/pull/{number}",
            self.organization
        )
    }
}
