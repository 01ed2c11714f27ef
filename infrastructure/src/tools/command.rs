//! Command execution tool: bash
//!
//! Runs a command through `sh -c` and reports stdout, stderr and the exit
//! status. A non-zero exit is ordinary output; only spawn failures and
//! timeouts mark the result as failed.

use super::policy::CommandPolicy;
use async_trait::async_trait;
use deckhand_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    traits::Tool,
    value_objects::{CommandOutput, ToolError, ToolResult, ToolResultMetadata},
};
use deckhand_domain::util::truncate_with_note;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// Tool name constant
pub const BASH: &str = "bash";

/// Default timeout for command execution (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Maximum size kept per output stream (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Get the tool definition for bash
pub fn bash_definition() -> ToolDefinition {
    ToolDefinition::new(
        BASH,
        "Bash",
        "Execute a shell command with `sh -c` and return its stdout, stderr and exit status. \
         Commands that look destructive must be approved by the user before they run.",
    )
    .with_parameter(
        ToolParameter::new("command", "The shell command to execute", true).with_type("string"),
    )
}

pub struct BashTool {
    definition: ToolDefinition,
    policy: CommandPolicy,
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl Default for BashTool {
    fn default() -> Self {
        Self::new(CommandPolicy::default())
    }
}

impl BashTool {
    pub fn new(policy: CommandPolicy) -> Self {
        Self {
            definition: bash_definition(),
            policy,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            working_dir: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, command_str: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command_str)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        // Linux: the kernel sends SIGTERM to the child if this process dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }
}

#[async_trait]
impl Tool for BashTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn requires_acceptance(&self, call: &ToolCall) -> bool {
        match call.get_string("command") {
            Some(command) => match self.policy.matched(command) {
                Some(label) => {
                    debug!(pattern = label, "Command matched destructive pattern");
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let command_str = match call.require_string("command") {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(BASH, ToolError::invalid_argument(e)),
        };

        let child = match self.command(command_str).spawn() {
            Ok(child) => child,
            Err(e) => {
                let message = format!("Failed to spawn command: {}", e);
                return ToolResult::failure(BASH, ToolError::execution_failed(&message))
                    .with_output(CommandOutput {
                        stdout: String::new(),
                        stderr: message,
                        exit_status: "-1".to_string(),
                    });
            }
        };

        // Dropping the wait future on timeout kills the child (kill_on_drop)
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return ToolResult::failure(BASH, ToolError::execution_failed(e.to_string()))
                    .with_output(CommandOutput {
                        stdout: String::new(),
                        stderr: e.to_string(),
                        exit_status: "-1".to_string(),
                    });
            }
            Err(_) => {
                let secs = self.timeout.as_secs();
                return ToolResult::failure(
                    BASH,
                    ToolError::timeout(format!("command exceeded {} seconds", secs)),
                )
                .with_output(CommandOutput {
                    stdout: String::new(),
                    stderr: format!("Command timed out after {} seconds", secs),
                    exit_status: "timeout".to_string(),
                })
                .with_duration(start.elapsed().as_millis() as u64);
            }
        };

        let exit_code = output.status.code();
        let exit_status = exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());

        let stdout = truncate_with_note(&String::from_utf8_lossy(&output.stdout), MAX_OUTPUT_SIZE);
        let stderr = truncate_with_note(&String::from_utf8_lossy(&output.stderr), MAX_OUTPUT_SIZE);

        let metadata = ToolResultMetadata {
            duration_ms: Some(start.elapsed().as_millis() as u64),
            bytes: Some(stdout.len() + stderr.len()),
            exit_code,
            ..Default::default()
        };

        ToolResult::success(
            BASH,
            CommandOutput {
                stdout,
                stderr,
                exit_status,
            },
        )
        .with_metadata(metadata)
    }

    fn display_action(&self, call: &ToolCall) -> String {
        format!(
            "Running command: {}",
            call.get_string("command").unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(command: &str) -> ToolCall {
        ToolCall::new(BASH).with_id("toolu_1").with_arg("command", command)
    }

    #[tokio::test]
    async fn test_echo() {
        let result = BashTool::default().execute(&call("echo hi")).await;

        assert!(result.is_success());
        assert_eq!(
            result.output.as_command(),
            Some(&CommandOutput {
                stdout: "hi\n".to_string(),
                stderr: String::new(),
                exit_status: "0".to_string(),
            })
        );
        assert_eq!(result.metadata.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_data() {
        let result = BashTool::default()
            .execute(&call("echo oops >&2; exit 3"))
            .await;

        assert!(result.is_success());
        let output = result.output.as_command().unwrap();
        assert_eq!(output.stdout, "");
        assert_eq!(output.stderr, "oops\n");
        assert_eq!(output.exit_status, "3");
    }

    #[tokio::test]
    async fn test_timeout() {
        let tool = BashTool::default().with_timeout(Duration::from_millis(200));
        let result = tool.execute(&call("sleep 5")).await;

        assert!(result.is_error());
        assert_eq!(result.error().unwrap().code, "TIMEOUT");
        assert_eq!(result.output.as_command().unwrap().exit_status, "timeout");
    }

    #[tokio::test]
    async fn test_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let tool = BashTool::default().with_working_dir(dir.path());
        let result = tool.execute(&call("touch marker && ls")).await;

        assert_eq!(result.output.as_command().unwrap().stdout, "marker\n");
        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn test_requires_acceptance_uses_policy() {
        let tool = BashTool::default();
        assert!(tool.requires_acceptance(&call("sudo rm -rf /")));
        assert!(!tool.requires_acceptance(&call("ls")));
        assert!(!tool.requires_acceptance(&ToolCall::new(BASH)));

        let permissive = BashTool::new(CommandPolicy::empty());
        assert!(!permissive.requires_acceptance(&call("sudo ls")));
    }

    #[test]
    fn test_definition_and_display() {
        let tool = BashTool::default();
        assert_eq!(tool.name(), "bash");
        assert_eq!(tool.definition().display_name, "Bash");
        assert_eq!(tool.definition().required().collect::<Vec<_>>(), vec!["command"]);
        assert_eq!(tool.display_action(&call("ls -la")), "Running command: ls -la");
        assert!(tool.validate(&ToolCall::new(BASH)).is_err());
    }
}
