//! Configuration file loading for deckhand
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `DECKHAND_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./deckhand.toml`
//! 4. Global: `~/.config/deckhand/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileAgentConfig, FileConfig,
    FileLoggingConfig, FileReplConfig, FileToolsConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
