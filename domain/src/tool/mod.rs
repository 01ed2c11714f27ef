//! Tool domain module
//!
//! This module defines the contract between the agent runtime and the local
//! tools it may invoke: how a tool is described to the model, how a call is
//! validated, and what a result looks like.
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (schema)       │    │ (invocation) │    │ (output)     │
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`] - name, display name, description, ordered parameters
//! - [`ToolCall`] - an invocation request keyed by its `tool_use_id`
//! - [`ToolResult`] - text or command output, error flag, optional [`FileChange`]
//! - [`Tool`] - the async capability trait
//! - [`ToolValidator`] - presence check of required parameters
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): port for name-based dispatch
//! - **Infrastructure** (`ToolRegistry`, `BashTool`, `ReadFileTool`,
//!   `WriteFileTool`): concrete execution

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter};
pub use traits::{DefaultToolValidator, Tool, ToolValidator};
pub use value_objects::{
    CommandOutput, FileChange, ToolError, ToolOutput, ToolResult, ToolResultMetadata,
};
