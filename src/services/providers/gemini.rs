/// Gemini API provider
///
/// Uses the REST `generateContent` endpoint:
/// `POST {api_url}/v1beta/models/{model}:generateContent`, keyed by the
/// `x-goog-api-key` header so the key never shows up in URLs or error messages.
///
/// Only the first text part of the first candidate is used.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    services::providers::GenerativeClient,
};

const PROBE_PROMPT: &str = "test";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    /// Creates a new Gemini client. The key must be non-blank.
    pub fn new(api_key: String, api_url: String, model: String) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Gemini API key is required".to_string(),
            ));
        }

        Ok(Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
        })
    }

    /// Sends a throwaway prompt to confirm the key and model are usable
    pub async fn probe(&self, timeout: Duration) -> AppResult<()> {
        self.generate(PROBE_PROMPT, timeout).await?;
        tracing::info!(model = %self.model, provider = "gemini", "Gemini model reachable");
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

#[async_trait::async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &str, timeout: Duration) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(timeout)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .first_text()
            .ok_or_else(|| AppError::ExternalApi("Empty response from Gemini".to_string()))?;

        tracing::debug!(
            provider = "gemini",
            chars = text.len(),
            "Generated content"
        );

        Ok(text)
    }
}

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_ref()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
