//! Configuration file loader with multi-source merging

use super::file_config::{ConfigError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "deckhand.toml";

/// Prefix of environment overrides (`DECKHAND_AGENT__MAX_TOKENS=4096`)
pub const ENV_PREFIX: &str = "DECKHAND_";

/// Configuration loader that handles file discovery and merging
///
/// Priority (highest to lowest):
/// 1. `DECKHAND_*` environment variables (`__` separates sections)
/// 2. Explicit config path (`--config`)
/// 3. Project root: `./deckhand.toml`
/// 4. Global: `~/.config/deckhand/config.toml`
/// 5. Default values
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global_path: Option<PathBuf>,
    project_path: PathBuf,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            global_path: Self::global_config_path(),
            project_path: PathBuf::from(PROJECT_CONFIG_FILE),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_path(mut self, path: Option<PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = path.into();
        self
    }

    /// The merged provider chain, before extraction
    pub fn figment(&self, config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = &self.global_path
            && global_path.exists()
        {
            debug!(path = %global_path.display(), "Using global config");
            figment = figment.merge(Toml::file(global_path));
        }

        if self.project_path.exists() {
            debug!(path = %self.project_path.display(), "Using project config");
            figment = figment.merge(Toml::file(&self.project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration from all sources
    pub fn load(&self, config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let config: FileConfig = self.figment(config_path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `~/.config/deckhand/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(".config").join("deckhand").join("config.toml"))
    }
}
