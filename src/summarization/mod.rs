//! Student summaries generated by an external text-generation runtime.
//!
//! The Ollama-backed client issues a single non-streamed `POST /api/generate` per request and
//! relays the `response` field verbatim. There are no retries and no timeout beyond the HTTP
//! client's defaults.

use crate::config::Config;
use crate::students::Student;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced while requesting a summary from the provider.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached or the HTTP client could not be built.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider answered with a non-success status.
    #[error("Provider returned an error: {0}")]
    GenerationFailed(String),
    /// Provider response was not JSON or lacked a string `response` field.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Fully assembled prompt.
    pub prompt: String,
}

/// Interface implemented by text-generation providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate text for the supplied prompt.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the natural-language prompt describing `student`.
pub fn build_prompt(student: &Student) -> String {
    format!(
        "Summarize this student in a few words as a sentence: Name: {}, Age: {}, Email: {}",
        student.name, student.age, student.email
    )
}

/// Build the provider client described by `config`.
pub fn get_summarization_client(
    config: &Config,
) -> Result<Box<dyn SummarizationClient>, SummarizationClientError> {
    Ok(Box::new(OllamaSummarizationClient::new(
        config.ollama_url.clone(),
    )?))
}

/// Client for the Ollama `/api/generate` endpoint.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
}

impl OllamaSummarizationClient {
    /// Create a client targeting the Ollama runtime at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("studentapi/summary")
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": request.model,
            "prompt": request.prompt,
            "stream": false,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        Ok(body.response)
    }
}
