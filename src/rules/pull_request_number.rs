//! Pull request number extraction from commit messages.

use std::sync::LazyLock;

use regex::Regex;

static AUTOMATION_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"\[#([0-9]+)\]") {
        Ok(re) => Some(re),
        Err(_) => None,
    });

static MERGE_COMMIT: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"Merge pull request #([0-9]+)") {
        Ok(re) => Some(re),
        Err(_) => None,
    });

/// Finds the pull request a commit message belongs to.
///
/// The `[#123]` tag inserted by automation takes priority; the merge-commit
/// phrase `Merge pull request #123` is only tried when no tag is present.
/// Zero and out-of-range numbers are treated as absent.
#[must_use]
pub fn extract_pull_request_number(message: &str) -> Option<u64> {
    [&*AUTOMATION_TAG, &*MERGE_COMMIT]
        .into_iter()
        .flatten()
        .find_map(|pattern| pattern.captures(message))
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
        .filter(|number| *number > 0)
}
