//! Identity wrappers for repositories and access tokens.

use std::fmt;

use crate::error::AutomationError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidPayload`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, AutomationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AutomationError::invalid_payload(
                "repository owner must not be empty",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidPayload`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, AutomationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AutomationError::invalid_payload(
                "repository name must not be empty",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A repository addressed by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryRef {
    /// Creates a reference from raw owner and name strings.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidPayload`] when either part is blank.
    pub fn new(owner: &str, name: &str) -> Result<Self, AutomationError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            name: RepositoryName::new(name)?,
        })
    }

    /// The owning user or organisation.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// The repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// REST path of the repository, e.g. `/repos/octokit/actions`.
    #[must_use]
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.name.as_str())
    }

    /// REST path of a resource below the repository.
    #[must_use]
    pub fn api_path_for(&self, suffix: &str) -> String {
        format!("{}/{}", self.api_path(), suffix.trim_start_matches('/'))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Configuration`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, AutomationError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AutomationError::Configuration {
                message: "GitHub token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(..)")
    }
}
