//! Text generation backends

mod ollama;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A backend that turns a prompt into narration
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;
}

pub enum Provider {
    Ollama(ollama::OllamaProvider),
}

impl Provider {
    pub fn from_name(name: &str, config: &Config) -> Result<Self, ProviderError> {
        match name.to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama(ollama::OllamaProvider::new(
                config.ollama_url.clone(),
            ))),
            _ => Err(ProviderError::UnknownProvider(name.to_string())),
        }
    }
}

#[async_trait]
impl Generator for Provider {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        match self {
            Provider::Ollama(p) => p.generate(model, prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        let config = Config::default();
        assert!(matches!(
            Provider::from_name("Ollama", &config),
            Ok(Provider::Ollama(_))
        ));
        assert!(matches!(
            Provider::from_name("openai", &config),
            Err(ProviderError::UnknownProvider(name)) if name == "openai"
        ));
    }
}
