//! Maps a person (by email or display name) to their identities on the
//! hosting platform and the chat system.
//!
//! Requests to the credential service are signed with an HMAC-SHA256 of the
//! lookup value, sent in the `Shuttlerock-Signature` header.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;

use crate::error::AutomationError;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "Shuttlerock-Signature";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// A person's identities across the integrated systems.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Chat user ID direct messages are sent to.
    #[serde(default)]
    pub slack_id: String,
    /// Hosting platform login.
    #[serde(default)]
    pub github_username: String,
    /// Hosting platform token used to act as this person.
    #[serde(default)]
    pub github_token: String,
    /// Tracker account identifier.
    #[serde(default)]
    pub jira_account_id: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("slack_id", &self.slack_id)
            .field("github_username", &self.github_username)
            .field("github_token", &"<redacted>")
            .field("jira_account_id", &self.jira_account_id)
            .finish()
    }
}

/// Resolves a lookup value (email or display name) to [`Credentials`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Look up the credentials for `lookup`.
    async fn resolve(&self, lookup: &str) -> Result<Credentials, AutomationError>;
}

/// Credential resolver backed by the signed HTTP credential service.
#[derive(Clone)]
pub struct HttpCredentialResolver {
    prefix: String,
    secret: String,
    client: Client,
}

impl fmt::Debug for HttpCredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCredentialResolver")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl HttpCredentialResolver {
    /// Creates a resolver for the service at `prefix`, signing with `secret`.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError::Configuration` when the secret is blank or
    /// the HTTP client cannot be built.
    pub fn new(
        prefix: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, AutomationError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AutomationError::Configuration {
                message: "credentials API secret is required".to_owned(),
            });
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|error| AutomationError::Configuration {
                message: format!("failed to configure credentials HTTP client: {error}"),
            })?;
        Ok(Self {
            prefix: prefix.into(),
            secret,
            client,
        })
    }

    fn lookup_url(&self, lookup: &str) -> String {
        format!("{}{}", self.prefix, STANDARD.encode(lookup.as_bytes()))
    }
}

/// Signs `lookup` with `secret`, returning the header value.
///
/// # Errors
///
/// Returns `AutomationError::Configuration` if the key is rejected.
pub fn sign_lookup(secret: &str, lookup: &str) -> Result<String, AutomationError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|error| {
        AutomationError::Configuration {
            message: format!("credentials API secret is unusable: {error}"),
        }
    })?;
    mac.update(lookup.as_bytes());
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

#[derive(Deserialize)]
struct CredentialsResponse {
    #[serde(default)]
    status: String,
    #[serde(flatten)]
    credentials: Credentials,
}

#[async_trait]
impl CredentialResolver for HttpCredentialResolver {
    async fn resolve(&self, lookup: &str) -> Result<Credentials, AutomationError> {
        let failure = || AutomationError::Credentials {
            message: format!("Could not get credentials for the user {lookup}"),
        };

        let response = self
            .client
            .get(self.lookup_url(lookup))
            .header(SIGNATURE_HEADER, sign_lookup(&self.secret, lookup)?)
            .send()
            .await
            .map_err(|error| AutomationError::Network {
                message: format!("credentials request failed: {error}"),
            })?;

        let payload: CredentialsResponse = response.json().await.map_err(|_| failure())?;
        if payload.status != "ok" {
            return Err(failure());
        }
        Ok(payload.credentials)
    }
}
