//! Domain layer for deckhand
//!
//! This crate contains the tool contract, conversation types and the
//! confirmation vocabulary. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool**: a named, schema-described capability the model can invoke
//!   ([`Tool`], [`ToolDefinition`], [`ToolCall`], [`ToolResult`])
//! - **Confirmation**: a human yes/no on a flagged call
//!   ([`ConfirmationDecision`], [`ConfirmationState`])
//! - **Conversation**: the message history exchanged with the model
//!   ([`Conversation`], [`Message`], [`ContentBlock`])

pub mod agent;
pub mod context;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use agent::{ConfirmationDecision, ConfirmationState, strip_reasoning};
pub use context::{KnownContextFile, ProjectContext};
pub use core::{error::DomainError, model::Model};
pub use prompt::AgentPromptTemplate;
pub use session::{
    entities::{Conversation, Message, Role},
    response::{ContentBlock, LlmResponse, StopReason, TokenUsage},
};
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    traits::{DefaultToolValidator, Tool, ToolValidator},
    value_objects::{
        CommandOutput, FileChange, ToolError, ToolOutput, ToolResult, ToolResultMetadata,
    },
};
