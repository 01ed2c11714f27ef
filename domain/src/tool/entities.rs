//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a tool that can be offered to the model
///
/// Parameters keep their declaration order; it is the order the schema
/// lists them in and the order they are displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read_file")
    pub name: String,
    /// Human label shown in the terminal (e.g., "Read File")
    pub display_name: String,
    /// Capability summary shown to the model
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// JSON type hint (e.g., "string", "integer")
    pub param_type: String,
    /// Allowed values, if the parameter is an enumeration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Value assumed when the parameter is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of the required parameters, in declaration order
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            enum_values: Vec::new(),
            default: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// An invocation request issued by the agent runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Correlation token assigned by the model API (e.g. "toolu_01...")
    pub tool_use_id: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_use_id: String::new(),
            arguments: HashMap::new(),
        }
    }

    /// Build a call from a `tool_use` content block
    pub fn from_native(
        id: impl Into<String>,
        name: impl Into<String>,
        input: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            tool_name: name.into(),
            tool_use_id: id.into(),
            arguments: input,
        }
    }

    pub fn with_id(mut self, tool_use_id: impl Into<String>) -> Self {
        self.tool_use_id = tool_use_id.into();
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Whether `key` carries a value. JSON `null` counts as absent.
    pub fn has_arg(&self, key: &str) -> bool {
        self.arguments.get(key).is_some_and(|v| !v.is_null())
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional integer argument.
    ///
    /// Models occasionally send numbers as strings (`"3"`); those are accepted too.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.arguments.get(key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The arguments as a JSON object, for display and event payloads
    pub fn input_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition_keeps_declaration_order() {
        let tool = ToolDefinition::new("read_file", "Read File", "Read file contents")
            .with_parameter(ToolParameter::new("path", "File path to read", true))
            .with_parameter(
                ToolParameter::new("mode", "Read mode", true).with_enum(["Line", "Full"]),
            )
            .with_parameter(
                ToolParameter::new("context_lines", "Context", false)
                    .with_type("integer")
                    .with_default(2),
            );

        let names: Vec<_> = tool.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["path", "mode", "context_lines"]);
        assert_eq!(tool.required().collect::<Vec<_>>(), vec!["path", "mode"]);
        assert_eq!(tool.parameter("mode").unwrap().enum_values, vec!["Line", "Full"]);
        assert_eq!(
            tool.parameter("context_lines").unwrap().default,
            Some(serde_json::json!(2))
        );
    }

    #[test]
    fn test_tool_call_accessors() {
        let call = ToolCall::new("read_file")
            .with_id("toolu_1")
            .with_arg("path", "/test/file.txt")
            .with_arg("start_line", -3)
            .with_arg("end_line", "7")
            .with_arg("pattern", serde_json::Value::Null);

        assert_eq!(call.tool_use_id, "toolu_1");
        assert_eq!(call.get_string("path"), Some("/test/file.txt"));
        assert_eq!(call.require_string("path").unwrap(), "/test/file.txt");
        assert!(call.require_string("missing").is_err());
        assert_eq!(call.get_i64("start_line"), Some(-3));
        assert_eq!(call.get_i64("end_line"), Some(7));
        assert!(call.has_arg("path"));
        assert!(!call.has_arg("pattern"));
        assert!(!call.has_arg("missing"));
    }

    #[test]
    fn test_from_native() {
        let input = [("command".to_string(), serde_json::json!("ls"))]
            .into_iter()
            .collect();
        let call = ToolCall::from_native("toolu_abc", "bash", input);
        assert_eq!(call.tool_name, "bash");
        assert_eq!(call.tool_use_id, "toolu_abc");
        assert_eq!(call.input_json(), serde_json::json!({"command": "ls"}));
    }
}
