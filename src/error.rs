//! Error types shared by the automation handlers and their collaborators.

use thiserror::Error;

/// Errors surfaced while routing events or talking to external platforms.
///
/// "Not found" outcomes are not errors: lookups return `Ok(None)` and the
/// handlers treat them as terminal no-ops.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AutomationError {
    /// Configuration could not be loaded or a required value is missing.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The event payload did not have the expected shape.
    #[error("invalid event payload: {message}")]
    InvalidPayload {
        /// Description of what was missing or malformed.
        message: String,
    },

    /// A platform rejected the supplied credentials.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Error detail returned with the 401/403 response.
        message: String,
    },

    /// A platform returned a non-authentication API error.
    #[error("API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed while calling a platform.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A resource required by a mutation does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Which resource was missing.
        message: String,
    },

    /// The credential service could not map a user to platform identities.
    #[error("{message}")]
    Credentials {
        /// Error detail, naming the lookup value.
        message: String,
    },

    /// A pull request template failed to render.
    #[error("template error: {message}")]
    Template {
        /// Rendering failure detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl AutomationError {
    /// Builds an [`AutomationError::Api`] from any displayable detail.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Builds an [`AutomationError::InvalidPayload`] from any displayable detail.
    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }
}
