//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to serialize them for the
//! API" (infrastructure). The resulting JSON Schema is the wire contract with
//! the model: renaming a field or an enum value breaks any model prompted
//! with the old schema.

use deckhand_domain::tool::entities::ToolDefinition;

/// Port for converting tool definitions to LLM API format (JSON Schema).
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a `{name, description, input_schema}` object.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools, keeping the given order.
    fn all_tools_schema(&self, tools: &[&ToolDefinition]) -> Vec<serde_json::Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
