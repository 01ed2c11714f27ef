//! Model value object representing an LLM model

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models the chat session can talk to (Value Object)
///
/// The identifiers are the Anthropic Messages API aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Model {
    #[default]
    ClaudeSonnet45,
    ClaudeOpus41,
    ClaudeHaiku45,
    ClaudeSonnet4,
}

impl Model {
    /// Every selectable model, default first
    pub const ALL: [Model; 4] = [
        Model::ClaudeSonnet45,
        Model::ClaudeOpus41,
        Model::ClaudeHaiku45,
        Model::ClaudeSonnet4,
    ];

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::ClaudeSonnet45 => "claude-sonnet-4-5",
            Model::ClaudeOpus41 => "claude-opus-4-1",
            Model::ClaudeHaiku45 => "claude-haiku-4-5",
            Model::ClaudeSonnet4 => "claude-sonnet-4-0",
        }
    }

    /// Comma separated identifiers, for help texts and warnings
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(Model::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidModel(s.to_string()))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parse_known() {
        for model in Model::ALL {
            let parsed: Model = model.to_string().parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_model_parse_unknown() {
        let err = "gpt-4".parse::<Model>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid model: gpt-4");
    }

    #[test]
    fn test_model_default() {
        assert_eq!(Model::default(), Model::ClaudeSonnet45);
        assert!(Model::choices().starts_with("claude-sonnet-4-5"));
    }
}
