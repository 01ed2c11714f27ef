//! Agent configuration from TOML (`[agent]` section)

use deckhand_application::AgentConfig;
use deckhand_domain::Model;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default Messages API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Environment variable holding the API key unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// model = "claude-sonnet-4-5"
/// max_tokens = 8192
/// max_iterations = 25
/// base_url = "https://api.anthropic.com"
/// api_key_env = "ANTHROPIC_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Model id; unknown ids fall back to the default model with a warning
    pub model: Option<String>,
    pub max_tokens: u32,
    /// Model round-trips allowed per user turn
    pub max_iterations: usize,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let defaults = AgentConfig::default();
        Self {
            model: None,
            max_tokens: defaults.max_tokens,
            max_iterations: defaults.max_iterations,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl FileAgentConfig {
    /// Parse `model`, or `override_model` when given.
    ///
    /// Returns the model and, when the id was not recognised, the warning
    /// that was logged for it.
    pub fn parse_model(&self, override_model: Option<&str>) -> (Model, Option<String>) {
        let Some(id) = override_model.or(self.model.as_deref()) else {
            return (Model::default(), None);
        };

        match id.parse::<Model>() {
            Ok(model) => (model, None),
            Err(e) => {
                let message = format!(
                    "{}; falling back to {} (choices: {})",
                    e,
                    Model::default(),
                    Model::choices()
                );
                warn!("{}", message);
                (Model::default(), Some(message))
            }
        }
    }

    /// Build the runtime parameters, resolving the model as [`parse_model`](Self::parse_model) does
    pub fn to_agent_config(&self, override_model: Option<&str>) -> (AgentConfig, Option<String>) {
        let (model, warning) = self.parse_model(override_model);
        let config = AgentConfig::default()
            .with_model(model)
            .with_max_tokens(self.max_tokens)
            .with_max_iterations(self.max_iterations);
        (config, warning)
    }
}
