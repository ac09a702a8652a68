/*!
 * Transcript summarization.
 *
 * `Summarizer` is the seam the controller talks to; `OllamaSummarizer`
 * backs it with a local Ollama server.
 */

use async_trait::async_trait;
use log::info;
use std::time::Duration;

use crate::errors::SummarizationError;
use crate::models::Summary;
use crate::providers::Provider;
use crate::providers::ollama::{GenerationRequest, Ollama};

/// Something that turns a transcript into a summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Model identifier the summaries are tagged with
    fn model(&self) -> &str;

    /// Summarize `transcript` following the instruction in `prompt`
    async fn summarize(&self, transcript: &str, prompt: &str) -> Result<Summary, SummarizationError>;
}

/// Build the text sent to the model: instruction, blank line, transcript
pub fn build_prompt(prompt: &str, transcript: &str) -> String {
    format!("{}\n\n{}", prompt, transcript)
}

/// Summarizer backed by the Ollama `/api/generate` endpoint
#[derive(Debug, Clone)]
pub struct OllamaSummarizer {
    model: String,
    client: Ollama,
}

impl OllamaSummarizer {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            client: Ollama::from_url(base_url, timeout),
        }
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, transcript: &str, prompt: &str) -> Result<Summary, SummarizationError> {
        info!("Summarizing {} chars of transcript with {}", transcript.chars().count(), self.model);

        let request = GenerationRequest::new(&self.model, build_prompt(prompt, transcript));
        let response = self.client.complete(request).await?;

        Ok(Summary {
            model: self.model.clone(),
            text: Ollama::extract_text(&response),
        })
    }
}
