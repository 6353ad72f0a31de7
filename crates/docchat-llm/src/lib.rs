//! Client for a local Ollama-compatible generation backend.
//!
//! One blocking-per-query call: POST the assembled prompt to
//! `/api/generate` with streaming disabled and return the completed text.
//! Transport failures and non-2xx statuses surface as the recoverable
//! `Error::Backend` so the interactive loop can re-prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use docchat_core::config::LlmConfig;
use docchat_core::error::{Error, Result};
use docchat_core::traits::Generator;

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest { model: &self.model, prompt, stream: false };
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "generate request");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("{url} returned {status}: {detail}")));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| Error::Backend(format!("invalid response from {url}: {e}")))?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest { model: "llama3.1:8b", prompt: "hi", stream: false };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.1:8b");
        assert_eq!(json["prompt"], "hi");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let config = LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            model: "llama3.1:8b".to_string(),
            request_timeout_secs: 5,
        };
        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_recoverable_error() {
        // Nothing listens on this port; the request must fail fast and be
        // classified as recoverable.
        let config = LlmConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            model: "llama3.1:8b".to_string(),
            request_timeout_secs: 1,
        };
        let client = OllamaClient::new(&config).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(err.is_recoverable(), "transport failure should be retryable: {err}");
    }
}
