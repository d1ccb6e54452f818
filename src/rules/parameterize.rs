//! Slug generation for branch names.

const SEPARATOR: char = '-';

/// Converts arbitrary text into a branch-safe slug.
///
/// ASCII letters are lowercased and kept along with ASCII digits; every run of
/// other characters collapses into a single `-`. The result never starts or
/// ends with a separator, so applying the function twice changes nothing.
#[must_use]
pub fn parameterize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for character in text.chars() {
        if character.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(character.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Builds the deterministic branch name for an issue's pull request.
///
/// The owner's first name is taken from their email address (everything
/// before the first `@` or `.`), giving branches such as
/// `dave/studio-232-add-a-widget`.
#[must_use]
pub fn issue_branch_name(owner_email: &str, issue_key: &str, summary: &str) -> String {
    let first_name = owner_email
        .split(['@', '.'])
        .next()
        .unwrap_or(owner_email);
    format!(
        "{}/{}-{}",
        parameterize(first_name),
        parameterize(issue_key),
        parameterize(summary)
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{issue_branch_name, parameterize};

    #[rstest]
    #[case::simple("Add a Widget", "add-a-widget")]
    #[case::issue_key("STUDIO-232", "studio-232")]
    #[case::punctuation_runs("Fix: the (broken) widget!!", "fix-the-broken-widget")]
    #[case::leading_and_trailing("  --Hello World--  ", "hello-world")]
    #[case::non_ascii("Café crème", "caf-cr-me")]
    #[case::empty("", "")]
    #[case::only_separators("!!! ---", "")]
    fn parameterizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parameterize(input), expected);
    }

    #[rstest]
    #[case("Add a Widget")]
    #[case("  Ümlauts & [brackets] / slashes  ")]
    #[case("already-a-slug")]
    #[case("MiXeD_case__under_scores")]
    fn is_idempotent_and_safe(#[case] input: &str) {
        let once = parameterize(input);
        assert_eq!(parameterize(&once), once, "second pass changed {once}");
        assert!(
            once.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "unexpected character in {once}"
        );
        assert!(!once.starts_with('-') && !once.ends_with('-'));
        assert!(!once.contains("--"));
    }

    #[test]
    fn branch_name_uses_first_name_from_email() {
        let branch = issue_branch_name("dave.perrett@example.com", "STUDIO-232", "Add a Widget");
        assert_eq!(branch, "dave/studio-232-add-a-widget");
    }

    #[test]
    fn branch_name_without_dot_in_local_part() {
        let branch = issue_branch_name("Dave@example.com", "ISSUE-1", "Tidy up");
        assert_eq!(branch, "dave/issue-1-tidy-up");
    }
}
