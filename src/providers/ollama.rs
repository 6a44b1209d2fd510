//! Ollama provider implementation

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::ProviderError;

pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        tracing::debug!(model, prompt_len = prompt.len(), "ollama generate");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::ModelNotFound(model.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::InvalidResponse(format!(
                "{}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let generated: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(generated.response)
    }
}
