//! Error mapping helpers for the Octocrab gateway implementations.

use http::StatusCode;

use crate::error::AutomationError;

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the error is GitHub reporting a missing resource.
fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND
    )
}

/// Converts a lookup result so that a 404 becomes `Ok(None)`.
pub(super) fn found<T>(
    operation: &str,
    result: Result<T, octocrab::Error>,
) -> Result<Option<T>, AutomationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if is_not_found(&error) => Ok(None),
        Err(error) => Err(map_octocrab_error(operation, &error)),
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> AutomationError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(operation, source.status_code, Some(source.message.clone()));
    }

    if is_network_error(error) {
        return AutomationError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    AutomationError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> AutomationError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        AutomationError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        AutomationError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

#[derive(serde::Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Pulls the `message` field out of a GitHub error response body.
pub(super) fn response_message(body: &str) -> Option<String> {
    serde_json::from_str::<GitHubErrorBody>(body)
        .ok()
        .map(|parsed| parsed.message)
}
