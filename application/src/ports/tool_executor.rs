//! Tool Executor port
//!
//! Defines name-based dispatch over the tools offered to the model.

use deckhand_domain::tool::{entities::ToolDefinition, traits::Tool};
use std::sync::Arc;
use thiserror::Error;

/// Lookup failures of a tool registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of all tools, in registration order
    fn definitions(&self) -> Vec<&ToolDefinition>;

    /// Resolve a tool by name
    fn tool(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError>;

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.definitions()
            .into_iter()
            .map(|d| d.name.as_str())
            .collect()
    }
}
