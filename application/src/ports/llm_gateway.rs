//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use deckhand_domain::{LlmResponse, Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Errors after which further requests cannot succeed
    pub fn is_fatal(&self) -> bool {
        matches!(self, GatewayError::Authentication(_))
    }
}

/// One model call
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub model: Model,
    pub max_tokens: u32,
    pub system: Option<&'a str>,
    pub messages: &'a [Message],
    /// Tool schemas produced by a [`ToolSchemaPort`](super::tool_schema::ToolSchemaPort)
    pub tools: &'a [serde_json::Value],
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the conversation and return the model's next turn
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<LlmResponse, GatewayError>;
}
