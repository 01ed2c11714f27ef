//! Infrastructure layer for deckhand
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the three tools, the Anthropic gateway, configuration
//! file loading and project context loading.

pub mod anthropic;
pub mod config;
pub mod context;
pub mod tools;

// Re-export commonly used types
pub use anthropic::AnthropicGateway;
pub use config::{
    ConfigError, ConfigLoader, FileAgentConfig, FileConfig, FileLoggingConfig, FileReplConfig,
    FileToolsConfig,
};
pub use context::LocalContextLoader;
pub use tools::{BashTool, CommandPolicy, JsonSchemaToolConverter, ReadFileTool, ToolRegistry, WriteFileTool};
