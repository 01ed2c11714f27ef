//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show a spinner while waiting on the model or a tool
    pub show_spinner: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self { show_spinner: true }
    }
}
