//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the
//! `{name, description, input_schema}` objects the Messages API expects.

use deckhand_application::ports::tool_schema::ToolSchemaPort;
use deckhand_domain::tool::entities::ToolDefinition;

/// Default implementation producing JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Enumerations become `enum`, defaults become `default`. `required` lists
/// names in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(schema_type));
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            if !param.enum_values.is_empty() {
                prop.insert("enum".to_string(), serde_json::json!(param.enum_values));
            }
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
