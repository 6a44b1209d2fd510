//! Story configuration loaded from TOML files
//!
//! A story file lets a player reshape the adventure without rebuilding:
//! - Which model narrates, and where the backend lives
//! - How long a single narration may take
//! - The narrator's opening, continuation and farewell texts

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::prompts::{StoryPrompts, CHOICE_PLACEHOLDER};

/// Root story configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Backend overrides
    #[serde(default)]
    pub llm: LlmConfig,

    /// Narrator texts
    #[serde(default)]
    pub prompts: StoryPrompts,
}

impl StoryConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: StoryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let prompts = &self.prompts;
        for (name, text) in [
            ("opening", &prompts.opening),
            ("probe", &prompts.probe),
            ("continuation", &prompts.continuation),
            ("farewell", &prompts.farewell),
        ] {
            if text.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "prompt '{}' must not be empty",
                    name
                )));
            }
        }

        if !prompts.continuation.contains(CHOICE_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "continuation prompt must contain {}",
                CHOICE_PLACEHOLDER
            )));
        }

        if self.llm.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// LLM backend overrides; anything left out falls back to the environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model to narrate with
    #[serde(default)]
    pub model: Option<String>,

    /// Custom Ollama endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
