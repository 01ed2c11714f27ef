//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys take their defaults.

mod agent;
mod logging;
mod repl;
mod tools;

pub use agent::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileAgentConfig};
pub use logging::FileLoggingConfig;
pub use repl::FileReplConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: FileAgentConfig,
    pub tools: FileToolsConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.max_tokens",
                reason: "cannot be 0".to_string(),
            });
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.max_iterations",
                reason: "cannot be 0".to_string(),
            });
        }
        if self.agent.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "agent.api_key_env",
                reason: "cannot be empty".to_string(),
            });
        }
        if self.tools.command_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "tools.command_timeout_secs",
                reason: "cannot be 0".to_string(),
            });
        }
        if let Err(e) = self.tools.command_policy() {
            return Err(ConfigError::Invalid {
                field: "tools.extra_destructive_patterns",
                reason: e.to_string(),
            });
        }
        Ok(())
    }
}
