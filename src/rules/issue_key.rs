//! Tracker issue key extraction from pull request text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static TITLE_KEY: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"\[([A-Z][A-Z0-9]*-[0-9]+)\]") {
        Ok(re) => Some(re),
        Err(_) => None,
    });

static BODY_KEY: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"https?://[^\s/()]+/browse/([A-Z][A-Z0-9]*-[0-9]+)") {
        Ok(re) => Some(re),
        Err(_) => None,
    });

/// A tracker issue identifier such as `STUDIO-232`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueKey(String);

impl IssueKey {
    /// Wraps a key that is already known to be well formed.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the key.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Finds the issue key a pull request refers to.
///
/// The title is searched for a bracketed key (`[STUDIO-123] Fix widget`).
/// Only when the title has none is the body searched for a tracker link
/// (`https://example.atlassian.net/browse/STUDIO-123`).
#[must_use]
pub fn extract_issue_key(title: &str, body: Option<&str>) -> Option<IssueKey> {
    capture(TITLE_KEY.as_ref(), title)
        .or_else(|| body.and_then(|text| capture(BODY_KEY.as_ref(), text)))
}

fn capture(pattern: Option<&Regex>, text: &str) -> Option<IssueKey> {
    pattern?
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|key| IssueKey::new(key.as_str()))
}
