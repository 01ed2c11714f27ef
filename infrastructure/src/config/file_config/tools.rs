//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! command_timeout_secs = 120
//! extra_destructive_patterns = ["\\bgit\\s+push\\s+--force\\b"]
//! ```

use crate::tools::command::DEFAULT_TIMEOUT_SECS;
use crate::tools::policy::{CommandPolicy, PolicyError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Wall-clock limit for one `bash` call
    pub command_timeout_secs: u64,
    /// Regexes appended to the built-in destructive command list
    pub extra_destructive_patterns: Vec<String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: DEFAULT_TIMEOUT_SECS,
            extra_destructive_patterns: Vec::new(),
        }
    }
}

impl FileToolsConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Built-in patterns plus the configured extras
    pub fn command_policy(&self) -> Result<CommandPolicy, PolicyError> {
        CommandPolicy::builtin().with_patterns(&self.extra_destructive_patterns)
    }
}
