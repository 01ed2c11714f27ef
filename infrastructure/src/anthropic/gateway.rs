//! [`LlmGateway`] over the Anthropic Messages API

use super::types::{MessagesRequest, MessagesResponse, status_error};
use async_trait::async_trait;
use deckhand_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use deckhand_domain::LlmResponse;
use std::time::Duration;
use tracing::debug;

/// Value of the `anthropic-version` header
pub const API_VERSION: &str = "2023-06-01";

/// Per-request timeout; long tool-use turns can take minutes
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

pub struct AnthropicGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnthropicGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Read the API key from the environment variable `api_key_env`
    pub fn from_env(base_url: impl Into<String>, api_key_env: &str) -> Result<Self, GatewayError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::Authentication(format!(
                    "environment variable {} is not set",
                    api_key_env
                ))
            })?;
        Self::new(base_url, api_key)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl LlmGateway for AnthropicGateway {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = MessagesRequest::from(&request);
        debug!(
            model = body.model,
            messages = body.messages.len(),
            "Sending Messages API request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &text));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        debug!(stop_reason = ?parsed.stop_reason, "Received Messages API response");
        Ok(parsed.into())
    }
}
