//! Lifecycle events emitted by the agent runtime for the presentation layer
//!
//! Events travel over a single-consumer unbounded channel. The session loop
//! renders every event it receives; `ToolConfirmation` is the only one that
//! requires an answer, given back through
//! [`AgentRuntime::respond_confirmation`](super::agent_runtime::AgentRuntime::respond_confirmation).

use std::time::Duration;
use tokio::sync::mpsc;

/// Sending half handed to the runtime
pub type AgentEventSender = mpsc::UnboundedSender<AgentEvent>;
/// Receiving half owned by the session loop
pub type AgentEventReceiver = mpsc::UnboundedReceiver<AgentEvent>;

/// Create a connected sender/receiver pair
pub fn agent_event_channel() -> (AgentEventSender, AgentEventReceiver) {
    mpsc::unbounded_channel()
}

/// Events emitted by the agent runtime
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// User input was accepted for this turn
    UserSent { text: String },
    /// Assistant text, reasoning already removed
    AssistantReceive { text: String },
    /// A tool call passed the gate and is about to run
    ToolStart {
        tool_use_id: String,
        tool_name: String,
        input: serde_json::Value,
        display_action: String,
    },
    /// A tool call finished
    ToolEnd {
        tool_use_id: String,
        tool_name: String,
        elapsed: Duration,
        is_error: bool,
        /// First line of the result payload
        summary: String,
    },
    /// A human decision is required before the call can run
    ToolConfirmation {
        tool_use_id: String,
        tool_name: String,
        input: serde_json::Value,
        display_action: String,
    },
    /// A non-fatal error
    Error { message: String },
    /// A file was created
    FileNewContent { path: String, content: String },
    /// An existing file was rewritten
    FileUpdateContent {
        path: String,
        old_content: String,
        new_content: String,
    },
    /// Token counts of one model call
    TokenUsage {
        input_tokens: u64,
        output_tokens: u64,
    },
    /// The runtime shut down; the process exits after rendering this
    SystemClosed {
        reason: String,
        message: Option<String>,
    },
}
