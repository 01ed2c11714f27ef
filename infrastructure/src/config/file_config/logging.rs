//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// Without `dir`, logs go to stderr.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rotated log files (`~` is expanded)
    pub dir: Option<PathBuf>,
}

impl FileLoggingConfig {
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|d| PathBuf::from(shellexpand::tilde(&d.to_string_lossy()).into_owned()))
    }
}
