//! Keeps epic pull requests rebased onto their base branch.

use tracing::info;

use crate::error::AutomationError;
use crate::events::PullRequestEvent;
use crate::settings::AutomationSettings;

use super::{Effect, EffectExecutor, HandlerContext};

/// Handle a pull request update.
///
/// # Errors
///
/// Propagates Git data failures from the rebase.
pub async fn handle(
    context: &HandlerContext<'_>,
    event: &PullRequestEvent,
) -> Result<Vec<Effect>, AutomationError> {
    match decide(context.settings, event) {
        Some(effect) => EffectExecutor::new(context).run(vec![effect]).await,
        None => {
            info!(
                repository = %event.repository,
                number = event.pull_request.number,
                "not an epic pull request - ignoring"
            );
            Ok(Vec::new())
        }
    }
}

/// Decide whether the pull request is an epic that needs rebasing.
#[must_use]
pub fn decide(settings: &AutomationSettings, event: &PullRequestEvent) -> Option<Effect> {
    let pull = &event.pull_request;
    pull.title
        .starts_with(&settings.epic_title_prefix)
        .then(|| Effect::RebaseBranch {
            repository: event.repository.clone(),
            head: pull.head_ref.clone(),
            base: pull.base_ref.clone(),
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::decide;
    use crate::events::PullRequestEvent;
    use crate::github::locator::RepositoryRef;
    use crate::github::models::PullRequestView;
    use crate::handlers::Effect;
    use crate::settings::AutomationSettings;

    fn event(title: &str) -> PullRequestEvent {
        PullRequestEvent {
            repository: RepositoryRef::new("octokit", "actions").expect("valid repository"),
            pull_request: PullRequestView {
                number: 3,
                title: title.to_owned(),
                head_ref: "epic/checkout".to_owned(),
                base_ref: "develop".to_owned(),
                ..PullRequestView::default()
            },
        }
    }

    #[test]
    fn epic_pull_request_is_rebased_onto_its_base() {
        let settings = AutomationSettings::default();
        let effect = decide(&settings, &event("[Epic] Checkout rework"));
        assert!(matches!(
            effect,
            Some(Effect::RebaseBranch { ref head, ref base, .. })
                if head == "epic/checkout" && base == "develop"
        ));
    }

    #[rstest]
    #[case::plain("Checkout rework")]
    #[case::no_space("[Epic]Checkout")]
    #[case::lowercase("[epic] Checkout")]
    #[case::not_prefix("Part of [Epic] Checkout")]
    fn other_titles_are_left_alone(#[case] title: &str) {
        let settings = AutomationSettings::default();
        assert_eq!(decide(&settings, &event(title)), None);
    }
}
