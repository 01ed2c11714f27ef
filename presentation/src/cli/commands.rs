//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for deckhand
#[derive(Parser, Debug)]
#[command(name = "deckhand")]
#[command(author, version, about = "Chat with an LLM agent that can run commands and edit files")]
#[command(long_about = r#"
Deckhand is a terminal chat client for an LLM agent with three tools:
bash, read_file and write_file. Commands and file writes that look
destructive are shown to you first and only run after you answer "y".

Configuration is merged from (lowest to highest priority):
1. Built-in defaults
2. ~/.config/deckhand/config.toml   Global config
3. ./deckhand.toml                  Project-level config
4. --config <path>                  Explicit config file
5. DECKHAND_* environment variables (e.g. DECKHAND_AGENT__MODEL)

The API key is read from the variable named by agent.api_key_env
(ANTHROPIC_API_KEY by default).

Example:
  deckhand chat
  deckhand -vv chat --model claude-haiku-4-5
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an interactive chat session
    Chat {
        /// Model to chat with (overrides agent.model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Print token usage after every model call
        #[arg(long)]
        usage: bool,
    },
}

impl Cli {
    /// Default log filter for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_model() {
        let cli = Cli::parse_from(["deckhand", "-vv", "chat", "--model", "claude-opus-4-1"]);
        assert_eq!(cli.log_level(), "debug");
        assert_eq!(
            cli.command,
            Command::Chat {
                model: Some("claude-opus-4-1".to_string()),
                usage: false,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["deckhand", "chat", "--no-config", "--config", "x.toml"]);
        assert!(cli.no_config);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["deckhand", "ask", "hello"]).is_err());
        assert!(Cli::try_parse_from(["deckhand"]).is_err());
    }
}
