//! LLM response types for native tool use.
//!
//! A model turn is an array of content blocks mixing text and tool use
//! requests. When the stop reason is [`StopReason::ToolUse`], the caller runs
//! the requested tools and answers with [`ContentBlock::ToolResult`] blocks.

use crate::tool::entities::ToolCall;
use std::collections::HashMap;

/// A single block of content within a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Plain text.
    Text(String),

    /// A tool use request from the model.
    ToolUse {
        /// API-assigned ID for correlating with tool results (e.g. "toolu_abc123").
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },

    /// The answer to a `ToolUse` block, sent back in a user message.
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Natural end of response - the model is done.
    EndTurn,
    /// The model wants to call tools - execute them and return results.
    ToolUse,
    /// Hit the token limit - response may be truncated.
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

impl StopReason {
    pub fn parse(s: &str) -> Self {
        match s {
            "end_turn" | "stop_sequence" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// Token counts reported for one model call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A structured response from an LLM, supporting both text and tool use.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all `ToolUse` content blocks as `Vec<ToolCall>`.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::from_native(id, name, input.clone()))
                }
                _ => None,
            })
            .collect()
    }
}
