//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::error::AutomationError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `AutomationError::Configuration` when the base URI cannot be parsed
/// or `AutomationError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, AutomationError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| AutomationError::Configuration {
            message: format!("GitHub API URL is invalid: {error}"),
        })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| AutomationError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Parses a REST path into the URI form Octocrab's raw request methods take.
pub(super) fn route_uri(route: &str) -> Result<Uri, AutomationError> {
    route
        .parse::<Uri>()
        .map_err(|error| AutomationError::api(format!("invalid route {route}: {error}")))
}
