//! Inference capability and its shipped implementations
//!
//! Supports the Ollama `/api/generate` endpoint for local model inference.

use crate::config::InferenceConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during an inference call
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to reach the inference service
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with an error
    #[error("API error: {0}")]
    Api(String),

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Inference is turned off in configuration
    #[error("Inference is disabled")]
    Disabled,
}

/// Capability that turns a prompt into generated text
#[async_trait]
pub trait Inference: Send + Sync {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError>;
}

/// Builds the inference client selected by configuration
pub fn build_inference(config: &InferenceConfig) -> Result<Arc<dyn Inference>, InferenceError> {
    if !config.enabled {
        return Ok(Arc::new(DisabledInference));
    }
    Ok(Arc::new(OllamaInference::new(config)?))
}

/// Ollama API request format
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Inference client for an Ollama-compatible server
pub struct OllamaInference {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaInference {
    /// Creates a client from the inference configuration
    ///
    /// The overall call timeout is enforced by the schema generator, not here.
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl Inference for OllamaInference {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.endpoint);
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Api(format!("HTTP {}: {}", status, body)));
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        Ok(ollama_resp.response)
    }
}

/// Inference stand-in used when inference is turned off
///
/// Every call fails, so every page receives the fallback document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledInference;

#[async_trait]
impl Inference for DisabledInference {
    async fn infer(&self, _prompt: &str) -> Result<String, InferenceError> {
        Err(InferenceError::Disabled)
    }
}
