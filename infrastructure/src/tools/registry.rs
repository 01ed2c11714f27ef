//! Tool Registry
//!
//! The [`ToolRegistry`] holds the tools offered to the model for a session
//! and implements [`ToolExecutorPort`]. Registration order is kept for
//! display and schema output; lookup goes through a name index.
//!
//! # Usage
//!
//! ```ignore
//! use deckhand_infrastructure::tools::{CommandPolicy, ToolRegistry};
//!
//! let registry = ToolRegistry::default_tools(CommandPolicy::default(), timeout, None);
//! assert_eq!(registry.available_tools(), vec!["bash", "read_file", "write_file"]);
//!
//! let read = registry.tool("read_file")?;
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use deckhand_application::ports::tool_executor::{RegistryError, ToolExecutorPort};
use deckhand_domain::tool::{entities::ToolDefinition, traits::Tool};
use tracing::debug;

use super::command::BashTool;
use super::file::{ReadFileTool, WriteFileTool};
use super::policy::CommandPolicy;

/// Ordered set of tools, unique by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The three built-in tools: bash, read_file, write_file
    pub fn default_tools(
        policy: CommandPolicy,
        command_timeout: Duration,
        working_dir: Option<PathBuf>,
    ) -> Self {
        let mut bash = BashTool::new(policy).with_timeout(command_timeout);
        if let Some(dir) = working_dir {
            bash = bash.with_working_dir(dir);
        }

        let mut registry = Self::new();
        for tool in [
            Arc::new(bash) as Arc<dyn Tool>,
            Arc::new(ReadFileTool::new()),
            Arc::new(WriteFileTool::new()),
        ] {
            // Built-in names are distinct
            let _ = registry.register_arc(tool);
        }
        registry
    }

    /// Register a tool; names must be unique
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        debug!(tool = %name, "Registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }
}

impl ToolExecutorPort for ToolRegistry {
    fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    fn tool(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]))
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_domain::tool::entities::ToolCall;

    fn registry() -> ToolRegistry {
        ToolRegistry::default_tools(CommandPolicy::default(), Duration::from_secs(5), None)
    }

    #[test]
    fn test_default_tools_in_insertion_order() {
        assert_eq!(
            registry().available_tools(),
            vec!["bash", "read_file", "write_file"]
        );
    }

    #[test]
    fn test_unknown_tool_lookup() {
        let registry = registry();
        assert!(registry.tool("bash").is_ok());
        assert_eq!(
            registry.tool("rm_rf").err(),
            Some(RegistryError::UnknownTool("rm_rf".to_string()))
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry
            .register_arc(Arc::new(ReadFileTool::new()))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("read_file".to_string()));
        assert_eq!(registry.available_tools().len(), 3);
    }

    #[tokio::test]
    async fn test_lookup_routes_by_name() {
        let bash = registry().tool("bash").unwrap();
        let result = bash
            .execute(&ToolCall::new("bash").with_arg("command", "echo routed"))
            .await;
        assert!(result.is_success());
        assert_eq!(result.output.as_command().unwrap().stdout, "routed\n");
    }

    #[test]
    fn test_looked_up_tool_validates_required_parameters() {
        let read = registry().tool("read_file").unwrap();
        assert_eq!(
            read.validate(&ToolCall::new("read_file").with_arg("path", "/tmp")),
            Err("Missing required parameter 'mode' for tool 'read_file'".to_string())
        );
    }
}
