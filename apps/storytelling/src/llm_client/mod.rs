/// LLM Client — the single point of entry for Vertex AI Gemini calls.
///
/// No other module talks to the provider directly. Callers that need the
/// "always answer" contract go through `storytelling::generator` instead,
/// which turns every `LlmError` into a fallback.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ProviderSettings;

#[cfg(test)]
pub(crate) mod stub;

/// Default service account token on GCE, GKE and Cloud Run.
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Provider project is not configured")]
    NotConfigured,

    #[error("No access token available: {0}")]
    Credentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Direct `text` when present, otherwise the joined text parts of the
    /// first candidate.
    pub fn text(&self) -> Option<String> {
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            return Some(text.to_string());
        }

        let joined: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        (!joined.is_empty()).then_some(joined)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Thin wrapper over the Vertex AI `generateContent` REST method.
/// Every outbound request is bounded by the configured timeout.
#[derive(Clone)]
pub struct VertexClient {
    client: Client,
}

impl VertexClient {
    pub fn new(timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Sends one prompt and returns the model's text. No retries: the
    /// caller falls back on any error.
    pub async fn generate(
        &self,
        settings: &ProviderSettings,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let project = settings.project.as_deref().ok_or(LlmError::NotConfigured)?;
        let token = self.access_token(settings).await?;

        let url = generate_content_url(settings, project);
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GoogleError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        debug!(
            "Vertex call succeeded: model={}, chars={}",
            settings.model,
            text.len()
        );

        Ok(text)
    }

    async fn access_token(&self, settings: &ProviderSettings) -> Result<String, LlmError> {
        if let Some(token) = &settings.access_token {
            return Ok(token.clone());
        }

        let response = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| LlmError::Credentials(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Credentials(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let token: MetadataToken = response.json().await?;
        Ok(token.access_token)
    }
}

fn generate_content_url(settings: &ProviderSettings, project: &str) -> String {
    format!(
        "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
        settings.base_url(),
        project,
        settings.location,
        settings.model
    )
}
