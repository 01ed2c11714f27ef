//! File write tool: write_file
//!
//! | Command | Parameters |
//! |---------|------------|
//! | `create` | `file_text` |
//! | `str_replace` | `old_str`, `new_str` |
//! | `insert` | `insert_line`, `new_str` |
//! | `append` | `new_str` |
//!
//! A failed command leaves the file untouched.

use super::resolve_path;
use async_trait::async_trait;
use deckhand_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    traits::Tool,
    value_objects::{FileChange, ToolError, ToolResult},
};
use std::path::Path;
use tracing::debug;

/// Tool name constant
pub const WRITE_FILE: &str = "write_file";

const COMMANDS: [&str; 4] = ["create", "str_replace", "insert", "append"];

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write File",
        "Create or modify a file. Commands: create (write file_text, overwriting), \
         str_replace (replace the first occurrence of old_str with new_str), \
         insert (insert new_str after line insert_line; 0 inserts before the first line), \
         append (append new_str, adding a newline separator when needed).",
    )
    .with_parameter(ToolParameter::new("command", "Edit command to run", true).with_enum(COMMANDS))
    .with_parameter(ToolParameter::new("path", "Absolute path of the file", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("file_text", "Full file content for create", false).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("old_str", "Exact text to replace for str_replace", false)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("new_str", "Replacement, inserted or appended text", false)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("insert_line", "Line after which to insert (0 = top of file)", false)
            .with_type("integer"),
    )
}

/// A validated write command
#[derive(Debug, Clone, PartialEq, Eq)]
enum WriteCommand<'a> {
    Create { file_text: &'a str },
    StrReplace { old_str: &'a str, new_str: &'a str },
    Insert { insert_line: usize, new_str: &'a str },
    Append { new_str: &'a str },
}

impl<'a> WriteCommand<'a> {
    fn parse(call: &'a ToolCall) -> Result<Self, String> {
        let command = call.require_string("command")?;
        let require = |key: &str| {
            call.get_string(key)
                .ok_or_else(|| format!("Parameter '{}' is required for command '{}'", key, command))
        };

        match command {
            "create" => Ok(Self::Create {
                file_text: require("file_text")?,
            }),
            "str_replace" => {
                let old_str = require("old_str")?;
                if old_str.is_empty() {
                    return Err("Parameter 'old_str' must not be empty".to_string());
                }
                Ok(Self::StrReplace {
                    old_str,
                    new_str: require("new_str")?,
                })
            }
            "insert" => {
                let line = call.get_i64("insert_line").ok_or_else(|| {
                    format!("Parameter 'insert_line' is required for command '{}'", command)
                })?;
                let insert_line = usize::try_from(line)
                    .map_err(|_| format!("insert_line {} must not be negative", line))?;
                Ok(Self::Insert {
                    insert_line,
                    new_str: require("new_str")?,
                })
            }
            "append" => Ok(Self::Append {
                new_str: require("new_str")?,
            }),
            other => Err(format!(
                "unknown command '{}'; expected one of {}",
                other,
                COMMANDS.join(", ")
            )),
        }
    }

    /// Content after applying this command to `current` (`None` = no file yet)
    fn apply(&self, current: Option<&str>, path: &str) -> Result<String, String> {
        match *self {
            Self::Create { file_text } => Ok(file_text.to_string()),
            Self::StrReplace { old_str, new_str } => {
                let content = current.ok_or_else(|| format!("{} does not exist", path))?;
                if !content.contains(old_str) {
                    return Err(format!("old_str not found in {}", path));
                }
                Ok(content.replacen(old_str, new_str, 1))
            }
            Self::Insert {
                insert_line,
                new_str,
            } => {
                let content = current.ok_or_else(|| format!("{} does not exist", path))?;
                insert_at(content, insert_line, new_str)
            }
            Self::Append { new_str } => Ok(match current {
                None => new_str.to_string(),
                Some(content) if content.is_empty() || content.ends_with('\n') => {
                    format!("{}{}", content, new_str)
                }
                Some(content) => format!("{}\n{}", content, new_str),
            }),
        }
    }

    fn status(&self, path: &str, existed: bool) -> String {
        match self {
            Self::Create { .. } if existed => format!("File overwritten: {}", path),
            Self::Create { .. } => format!("File created: {}", path),
            Self::StrReplace { .. } => format!("Replaced text in {}", path),
            Self::Insert { insert_line, .. } => {
                format!("Inserted text at line {} in {}", insert_line, path)
            }
            Self::Append { .. } if existed => format!("Appended text to {}", path),
            Self::Append { .. } => format!("File created: {}", path),
        }
    }
}

/// Insert `new_str` as its own line after the 1-based line `line`.
/// Existing bytes are kept as they are; the new line takes the file's first
/// line terminator (`\r\n` or `\n`).
fn insert_at(content: &str, line: usize, new_str: &str) -> Result<String, String> {
    let segments: Vec<&str> = content.split_inclusive('\n').collect();
    if line > segments.len() {
        return Err(format!(
            "insert_line {} is out of range [0, {}]",
            line,
            segments.len()
        ));
    }

    let eol = match segments.first() {
        Some(first) if first.ends_with("\r\n") => "\r\n",
        _ => "\n",
    };

    let mut updated = String::with_capacity(content.len() + new_str.len() + eol.len());
    segments[..line].iter().for_each(|s| updated.push_str(s));
    if line == segments.len() && !content.ends_with('\n') {
        // New last line after an unterminated one
        if !content.is_empty() {
            updated.push_str(eol);
        }
        updated.push_str(new_str);
    } else {
        updated.push_str(new_str);
        updated.push_str(eol);
    }
    segments[line..].iter().for_each(|s| updated.push_str(s));
    Ok(updated)
}

#[derive(Debug, Clone)]
pub struct WriteFileTool {
    definition: ToolDefinition,
}

impl Default for WriteFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteFileTool {
    pub fn new() -> Self {
        Self {
            definition: write_file_definition(),
        }
    }
}

async fn read_existing(path: &Path, display: &str) -> Result<Option<String>, ToolError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ToolError::from_io(&e, display)),
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let path_str = match call.require_string("path") {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
        };
        let command = match WriteCommand::parse(call) {
            Ok(c) => c,
            Err(e) => {
                return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e))
                    .with_path(path_str);
            }
        };
        let path = resolve_path(path_str);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return ToolResult::failure(
                WRITE_FILE,
                ToolError::from_io(&e, &parent.display().to_string()),
            );
        }

        let old_content = match read_existing(&path, path_str).await {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(WRITE_FILE, e).with_path(path_str),
        };

        let new_content = match command.apply(old_content.as_deref(), path_str) {
            Ok(c) => c,
            Err(e) => {
                return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e))
                    .with_path(path_str);
            }
        };

        debug!(path = path_str, ?command, "write_file");

        if let Err(e) = tokio::fs::write(&path, &new_content).await {
            return ToolResult::failure(WRITE_FILE, ToolError::from_io(&e, path_str))
                .with_path(path_str);
        }

        let status = command.status(path_str, old_content.is_some());
        ToolResult::success(WRITE_FILE, status)
            .with_path(path_str)
            .with_file_change(FileChange {
                path: path_str.to_string(),
                old_content,
                new_content,
            })
    }

    fn display_action(&self, call: &ToolCall) -> String {
        let path = call.get_string("path").unwrap_or_default();
        match call.get_string("command") {
            Some("create") => format!("Creating file: {}", path),
            Some("insert") => format!(
                "Inserting into {} at line {}",
                path,
                call.get_i64("insert_line").unwrap_or_default()
            ),
            Some("append") => format!("Appending to {}", path),
            _ => format!("Editing file: {}", path),
        }
    }
}
