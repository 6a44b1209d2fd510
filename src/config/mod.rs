//! Application configuration

pub mod prompts;
pub mod story;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use prompts::{builtin as prompts_builtin, StoryPrompts};
pub use story::StoryConfig;

/// Model used when neither the environment nor a story file names one
pub const DEFAULT_MODEL: &str = "mistral";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ollama_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub transcript_dir: PathBuf,
    pub story_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".into()),
            model: env::var("ADVENTURE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            request_timeout_secs: env::var("ADVENTURE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            transcript_dir: env::var("ADVENTURE_TRANSCRIPT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            story_file: env::var("ADVENTURE_STORY").ok().map(PathBuf::from),
        })
    }

    /// Apply the `[llm]` overrides from a story file
    pub fn merge_story(&mut self, story: &StoryConfig) {
        if let Some(ref model) = story.llm.model {
            self.model = model.clone();
        }
        if let Some(ref endpoint) = story.llm.endpoint {
            self.ollama_url = endpoint.clone();
        }
        if let Some(secs) = story.llm.timeout_secs {
            self.request_timeout_secs = secs;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".into(),
            model: DEFAULT_MODEL.into(),
            request_timeout_secs: 120,
            transcript_dir: PathBuf::from("."),
            story_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_story_overrides() {
        let story = StoryConfig::from_str(
            r#"
[llm]
model = "llama3.2"
timeout_secs = 30
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.merge_story(&story);

        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.ollama_url, "http://localhost:11434");
    }

    #[test]
    fn test_empty_story_keeps_defaults() {
        let story = StoryConfig::default();
        let mut config = Config::default();
        config.merge_story(&story);

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, 120);
    }
}
