//! Tool domain value objects - immutable result and error types
//!
//! These types form the **output side** of the tool pipeline. Every tool
//! execution produces a [`ToolResult`]; failures never escape a tool as a
//! Rust error; they are folded into the result as an `Error: <message>`
//! payload so the model can read them and retry.

use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing/out-of-range parameters - the model can fix |
/// | `NOT_FOUND` | Unknown tool or resource |
/// | `EXECUTION_FAILED` | Runtime failure (I/O error, spawn error) |
/// | `PERMISSION_DENIED` | Access denied |
/// | `REJECTED` | A human declined the call at the confirmation gate |
/// | `TIMEOUT` | Operation timed out |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "PERMISSION_DENIED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            "PERMISSION_DENIED",
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn rejected() -> Self {
        Self::new("REJECTED", "Tool call was rejected by the user.")
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }

    /// Map an I/O error onto the closest code, keeping the OS message
    pub fn from_io(err: &std::io::Error, path: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::execution_failed(err.to_string()),
        }
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Captured output of a shell command.
///
/// `exit_status` is a string so that non-numeric outcomes (`"signal"`,
/// `"timeout"`, `"-1"` for spawn failures) travel the same way as codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: String,
}

/// Payload of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Text(String),
    Command(CommandOutput),
}

impl ToolOutput {
    /// Text sent back to the model as the `tool_result` content
    pub fn to_content(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Command(output) => serde_json::to_string(output)
                .unwrap_or_else(|_| format!("{}{}", output.stdout, output.stderr)),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(text) => Some(text),
            ToolOutput::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<&CommandOutput> {
        match self {
            ToolOutput::Command(output) => Some(output),
            ToolOutput::Text(_) => None,
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::Text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        ToolOutput::Text(text.to_string())
    }
}

impl From<CommandOutput> for ToolOutput {
    fn from(output: CommandOutput) -> Self {
        ToolOutput::Command(output)
    }
}

/// A file side effect produced by a successful write.
///
/// `old_content` is `None` when the file did not exist before the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub old_content: Option<String>,
    pub new_content: String,
}

/// Result of a tool execution.
///
/// Produced by every [`Tool`](super::traits::Tool) and consumed by the agent
/// runtime, which forwards [`content`](Self::content) to the model and turns
/// [`file_change`](Self::file_change) into display events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output payload; for failures this is the `Error: <message>` text
    pub output: ToolOutput,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
    /// File written by this call, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_change: Option<FileChange>,
}

/// Structured metadata about tool execution.
///
/// | Tool | `duration_ms` | `bytes` | `path` | `exit_code` | `match_count` |
/// |------|:---:|:---:|:---:|:---:|:---:|
/// | `bash` | yes | - | - | yes | - |
/// | `read_file` | - | yes | yes | - | search only |
/// | `write_file` | - | yes | yes | - | - |
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<ToolOutput>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: output.into(),
            error: None,
            metadata: ToolResultMetadata::default(),
            file_change: None,
        }
    }

    /// Create a failed result whose payload reads `Error: <message>`
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: ToolOutput::Text(format!("Error: {}", error.message)),
            error: Some(error),
            metadata: ToolResultMetadata::default(),
            file_change: None,
        }
    }

    /// Replace the payload, keeping the success flag and error
    pub fn with_output(mut self, output: impl Into<ToolOutput>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    pub fn with_file_change(mut self, change: FileChange) -> Self {
        self.metadata.bytes = Some(change.new_content.len());
        self.file_change = Some(change);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Text payload for the model
    pub fn content(&self) -> String {
        self.output.to_content()
    }
}
