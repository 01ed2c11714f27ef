//! Application-level configuration.
//!
//! Parameters that control the tool-use loop. Values come from the file
//! configuration in the infrastructure layer and the `--model` flag.

use deckhand_domain::Model;

/// Tool-use loop parameters.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: Model,
    /// `max_tokens` sent with every model call.
    pub max_tokens: u32,
    /// Maximum model round-trips for one user turn.
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_tokens: 8192,
            max_iterations: 25,
        }
    }
}

impl AgentConfig {
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }
}
