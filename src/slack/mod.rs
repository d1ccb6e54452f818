//! Team chat access.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AutomationError;

/// Default Slack Web API endpoint.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Sends chat messages to people.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send `text` as a direct message to the chat user `user_id`.
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), AutomationError>;
}

/// Chat gateway backed by the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackGateway {
    api_url: String,
    token: String,
    client: Client,
}

impl SlackGateway {
    /// Creates a gateway posting as the bot owning `token`.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError::Configuration` when the HTTP client cannot
    /// be built.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, AutomationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|error| AutomationError::Configuration {
                message: format!("failed to configure Slack HTTP client: {error}"),
            })?;
        Ok(Self {
            api_url: api_url.into(),
            token: token.into(),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl ChatGateway for SlackGateway {
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), AutomationError> {
        let endpoint = format!("{}/chat.postMessage", self.api_url.trim_end_matches('/'));
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.token)
            .json(&PostMessage {
                channel: user_id,
                text,
            })
            .send()
            .await
            .map_err(|error| AutomationError::Network {
                message: format!("chat message transport failed: {error}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutomationError::Api {
                message: format!("chat message failed with status {}", status.as_u16()),
            });
        }

        let payload: PostMessageResponse =
            response.json().await.map_err(|error| AutomationError::Api {
                message: format!("chat response JSON decoding failed: {error}"),
            })?;
        if payload.ok {
            Ok(())
        } else {
            Err(AutomationError::Api {
                message: format!(
                    "chat message rejected: {}",
                    payload.error.as_deref().unwrap_or("unknown error")
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{ChatGateway, SlackGateway};
    use crate::error::AutomationError;

    #[tokio::test]
    async fn posts_direct_message_with_bot_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(header("authorization", "Bearer xoxb-test"))
            .and(body_json(json!({ "channel": "U123", "text": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = SlackGateway::new(server.uri(), "xoxb-test").expect("gateway should build");
        gateway
            .send_direct_message("U123", "hello")
            .await
            .expect("message should send");
    }

    #[tokio::test]
    async fn rejected_message_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": false, "error": "channel_not_found" })),
            )
            .mount(&server)
            .await;

        let gateway = SlackGateway::new(server.uri(), "xoxb-test").expect("gateway should build");
        let result = gateway.send_direct_message("U404", "hello").await;

        let Err(AutomationError::Api { message }) = result else {
            panic!("expected Api error, got {result:?}");
        };
        assert!(message.contains("channel_not_found"), "unexpected: {message}");
    }
}
