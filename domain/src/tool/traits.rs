//! Tool domain traits
//!
//! [`ToolValidator`] is pure domain logic. [`Tool`] is the capability
//! contract every concrete tool implements; the implementations live in the
//! infrastructure layer because they touch the filesystem and spawn processes.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;
use async_trait::async_trait;

/// Validator for tool calls
///
/// Checks presence only. Types and ranges are checked by the tool itself
/// during execution, where a failure can be reported with context.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for name in definition.required() {
            if !call.has_arg(name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    name, definition.name
                ));
            }
        }
        Ok(())
    }
}

/// A capability the agent can invoke.
///
/// Implementations are constructed once per session and shared behind an
/// `Arc`; they hold only immutable configuration.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, display name, description and parameter schema
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Presence check of the required parameters
    fn validate(&self, call: &ToolCall) -> Result<(), String> {
        DefaultToolValidator.validate(call, self.definition())
    }

    /// Whether a human must approve this call before it runs
    fn requires_acceptance(&self, _call: &ToolCall) -> bool {
        false
    }

    /// Run the tool. Every failure is encoded in the returned result.
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// One-line summary of what the call is about to do
    fn display_action(&self, call: &ToolCall) -> String;
}
