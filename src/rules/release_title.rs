//! Release candidate title parsing.

use std::sync::LazyLock;

use regex::Regex;

static RELEASE_TITLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"^Release Candidate ([0-9-]+) \(([A-Za-z\s]+)\)$") {
        Ok(re) => Some(re),
        Err(_) => None,
    });

/// Parts of a title such as `Release Candidate 2021-01-12-0426 (Energetic Eagle)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTitle {
    date_token: String,
    release_name: String,
}

impl ReleaseTitle {
    /// Builds a title from its parts.
    #[must_use]
    pub fn new(date_token: impl Into<String>, release_name: impl Into<String>) -> Self {
        Self {
            date_token: date_token.into(),
            release_name: release_name.into(),
        }
    }

    /// Parses a release candidate pull request title. The whole title must
    /// match; anything else returns `None`.
    #[must_use]
    pub fn parse(title: &str) -> Option<Self> {
        let captures = RELEASE_TITLE.as_ref()?.captures(title)?;
        let date_token = captures.get(1)?.as_str();
        let release_name = captures.get(2)?.as_str();
        Some(Self::new(date_token, release_name))
    }

    /// The date token, e.g. `2021-01-12-0426`.
    #[must_use]
    pub fn date_token(&self) -> &str {
        &self.date_token
    }

    /// The human release name, e.g. `Energetic Eagle`.
    #[must_use]
    pub fn release_name(&self) -> &str {
        &self.release_name
    }

    /// Tag created for the release, e.g. `v2021-01-12-0426`.
    #[must_use]
    pub fn tag_name(&self) -> String {
        format!("v{}", self.date_token)
    }

    /// Renders the title back into pull request form.
    #[must_use]
    pub fn to_title(&self) -> String {
        format!(
            "Release Candidate {} ({})",
            self.date_token, self.release_name
        )
    }
}

/// Drops the heading line of a release pull request body, keeping the notes.
#[must_use]
pub fn release_notes_from_body(body: &str) -> String {
    body.split('\n').skip(1).collect::<Vec<_>>().join("\n")
}
