//! Messages API wire types and conversions to/from domain types

use deckhand_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use deckhand_domain::{ContentBlock, LlmResponse, Message, StopReason, TokenUsage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Request ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'static str,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: Vec<ApiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [serde_json::Value]>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBlock<'a> {
    Text {
        text: &'a str,
    },
    ToolUse {
        id: &'a str,
        name: &'a str,
        input: &'a HashMap<String, serde_json::Value>,
    },
    ToolResult {
        tool_use_id: &'a str,
        content: &'a str,
        is_error: bool,
    },
}

impl<'a> From<&'a ContentBlock> for RequestBlock<'a> {
    fn from(block: &'a ContentBlock) -> Self {
        match block {
            ContentBlock::Text(text) => RequestBlock::Text { text },
            ContentBlock::ToolUse { id, name, input } => RequestBlock::ToolUse { id, name, input },
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => RequestBlock::ToolResult {
                tool_use_id,
                content,
                is_error: *is_error,
            },
        }
    }
}

impl<'a> From<&'a Message> for ApiMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.iter().map(RequestBlock::from).collect(),
        }
    }
}

impl<'a> From<&CompletionRequest<'a>> for MessagesRequest<'a> {
    fn from(request: &CompletionRequest<'a>) -> Self {
        Self {
            model: request.model.as_str(),
            max_tokens: request.max_tokens,
            system: request.system,
            messages: request.messages.iter().map(ApiMessage::from).collect(),
            tools: (!request.tools.is_empty()).then_some(request.tools),
        }
    }
}

// ─── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ResponseBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    /// Thinking, server tool blocks and anything newer
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct ApiUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl From<MessagesResponse> for LlmResponse {
    fn from(response: MessagesResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(ContentBlock::Text(text)),
                ResponseBlock::ToolUse { id, name, input } => {
                    let input = match input {
                        serde_json::Value::Object(map) => map.into_iter().collect(),
                        _ => HashMap::new(),
                    };
                    Some(ContentBlock::ToolUse { id, name, input })
                }
                ResponseBlock::Unsupported => None,
            })
            .collect();

        LlmResponse {
            content,
            stop_reason: response.stop_reason.as_deref().map(StopReason::parse),
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Map a non-success HTTP status and body to a gateway error
pub fn status_error(status: u16, body: &str) -> GatewayError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| format!("{}: {}", e.error.kind, e.error.message))
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 | 403 => GatewayError::Authentication(detail),
        429 => GatewayError::RateLimited,
        408 | 504 => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_domain::Model;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let messages = vec![
            Message::user("list files"),
            Message::assistant(vec![
                ContentBlock::Text("Sure.".into()),
                ContentBlock::ToolUse {
                    id: "toolu_1".into(),
                    name: "bash".into(),
                    input: HashMap::from([("command".to_string(), json!("ls"))]),
                },
            ]),
            Message::tool_results(vec![ContentBlock::ToolResult {
                tool_use_id: "toolu_1".into(),
                content: "Error: Tool call was rejected by the user.".into(),
                is_error: true,
            }]),
        ];
        let request = CompletionRequest {
            model: Model::ClaudeHaiku45,
            max_tokens: 512,
            system: Some("be brief"),
            messages: &messages,
            tools: &[],
        };

        let value = serde_json::to_value(MessagesRequest::from(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "claude-haiku-4-5",
                "max_tokens": 512,
                "system": "be brief",
                "messages": [
                    {"role": "user", "content": [{"type": "text", "text": "list files"}]},
                    {"role": "assistant", "content": [
                        {"type": "text", "text": "Sure."},
                        {"type": "tool_use", "id": "toolu_1", "name": "bash", "input": {"command": "ls"}}
                    ]},
                    {"role": "user", "content": [{
                        "type": "tool_result",
                        "tool_use_id": "toolu_1",
                        "content": "Error: Tool call was rejected by the user.",
                        "is_error": true
                    }]}
                ]
            })
        );
    }

    #[test]
    fn test_tools_included_when_present() {
        let tools = vec![json!({"name": "bash"})];
        let request = CompletionRequest {
            model: Model::default(),
            max_tokens: 1,
            system: None,
            messages: &[],
            tools: &tools,
        };
        let value = serde_json::to_value(MessagesRequest::from(&request)).unwrap();
        assert_eq!(value["tools"], json!([{"name": "bash"}]));
        assert!(value.get("system").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let body = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "x"},
                {"type": "text", "text": "Reading it."},
                {"type": "tool_use", "id": "toolu_9", "name": "read_file",
                 "input": {"path": "/tmp/a", "mode": "Full"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 120, "output_tokens": 30}
        });

        let response: MessagesResponse = serde_json::from_value(body).unwrap();
        let response = LlmResponse::from(response);

        assert_eq!(response.content.len(), 2);
        assert_eq!(response.text_content(), "Reading it.");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                input_tokens: 120,
                output_tokens: 30
            })
        );

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_use_id, "toolu_9");
        assert_eq!(calls[0].get_string("mode"), Some("Full"));
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = status_error(401, body);
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Authentication failed: authentication_error: invalid x-api-key"
        );

        assert!(matches!(status_error(429, ""), GatewayError::RateLimited));
        assert_eq!(
            status_error(500, "upstream down").to_string(),
            "Request failed: HTTP 500: upstream down"
        );
    }
}
