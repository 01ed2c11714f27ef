//! System prompt for the chat agent

use crate::agent::reasoning::{REASONING_CLOSE, REASONING_OPEN};
use crate::context::ProjectContext;
use crate::tool::entities::ToolDefinition;
use crate::util::truncate_str;

/// Instruction files longer than this are cut before entering the prompt
const MAX_INSTRUCTIONS_BYTES: usize = 16 * 1024;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt for a chat session.
    ///
    /// Tool schemas travel separately through the API's `tools` field; only
    /// the names and display names are listed here.
    pub fn system(context: &ProjectContext, tools: &[&ToolDefinition]) -> String {
        let tool_list = tools
            .iter()
            .map(|t| format!("- `{}` ({}): {}", t.name, t.display_name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = format!(
            r#"You are a coding assistant working in a user's local project through a terminal.

## Environment

- Working directory: {working_dir}
- Platform: {platform}
- Project type: {project_type}

## Tools

{tool_list}

## Guidelines

1. Use absolute paths for file tools.
2. Read a file before editing it, and prefer `str_replace` over rewriting whole files.
3. Commands that look destructive are shown to the user for approval. If a call is rejected, do not retry it unchanged; explain or choose another approach.
4. Keep answers short. Private reasoning goes between {open} and {close}; it is not shown to the user."#,
            working_dir = context.working_dir,
            platform = context.platform,
            project_type = context.project_type.as_deref().unwrap_or("unknown"),
            open = REASONING_OPEN,
            close = REASONING_CLOSE,
        );

        if let (Some(instructions), Some(source)) =
            (&context.instructions, context.instructions_source)
        {
            prompt.push_str(&format!(
                "\n\n## Project Instructions ({})\n\n{}",
                source,
                truncate_str(instructions, MAX_INSTRUCTIONS_BYTES)
            ));
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::KnownContextFile;

    #[test]
    fn test_system_prompt_contains_environment_and_tools() {
        let context = ProjectContext::new("/work/app", "linux").with_project_type("rust");
        let bash = ToolDefinition::new("bash", "Bash", "Run a shell command");
        let prompt = AgentPromptTemplate::system(&context, &[&bash]);

        assert!(prompt.contains("Working directory: /work/app"));
        assert!(prompt.contains("Platform: linux"));
        assert!(prompt.contains("Project type: rust"));
        assert!(prompt.contains("- `bash` (Bash): Run a shell command"));
        assert!(!prompt.contains("Project Instructions"));
    }

    #[test]
    fn test_system_prompt_includes_instructions() {
        let context = ProjectContext::new("/work", "macos")
            .with_instructions(KnownContextFile::AgentsMd, "Run cargo fmt before committing.");
        let prompt = AgentPromptTemplate::system(&context, &[]);

        assert!(prompt.contains("## Project Instructions (AGENTS.md)"));
        assert!(prompt.contains("Run cargo fmt before committing."));
        assert!(prompt.contains("Project type: unknown"));
    }
}
