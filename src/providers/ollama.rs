use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with Ollama API
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    /// Model name to use for generation
    pub model: String,
    /// Prompt to generate from
    pub prompt: String,
    /// Whether to stream the response
    pub stream: bool,
}

/// Generation response from the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default = "default_done")]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

fn default_done() -> bool {
    true
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// Parse a `/api/generate` body.
///
/// A non-streaming call returns one JSON object. Servers that ignore
/// `stream: false` answer with JSON lines instead; their `response`
/// fragments are concatenated.
pub fn parse_generation_response(body: &str) -> Result<GenerationResponse, ProviderError> {
    match serde_json::from_str::<GenerationResponse>(body) {
        Ok(response) => Ok(response),
        Err(e) => {
            let chunks: Vec<GenerationResponse> = body
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| serde_json::from_str::<GenerationResponse>(line).ok())
                .collect();

            let Some(last) = chunks.last() else {
                let preview: String = body.chars().take(500).collect();
                error!("Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}", e, preview);
                return Err(ProviderError::ParseError(e.to_string()));
            };

            Ok(GenerationResponse {
                model: last.model.clone(),
                created_at: last.created_at.clone(),
                response: chunks.iter().map(|chunk| chunk.response.as_str()).collect(),
                done: last.done,
                prompt_eval_count: last.prompt_eval_count,
                eval_count: last.eval_count,
            })
        }
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL
    pub fn from_url(url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                // Ollama speaks HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL the client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("POST {} (model: {}, prompt: {} chars)", url, request.model, request.prompt.chars().count());

        let response = self.client.post(&url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_text = response.text().await?;
        parse_generation_response(&response_text)
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await?
            .json()
            .await?;

        response["version"].as_str()
            .map(|version| version.to_string())
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {} at {}", version, self.base_url);
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
