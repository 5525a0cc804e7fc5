//! Story generation — pluggable, trait-based backend behind the story endpoint.
//!
//! Default: `VertexGenerator` (Gemini on Vertex AI, configured per call from
//! the environment). `DisabledGenerator` never calls out and always yields
//! the fallback path.
//!
//! `AppState` holds an `Arc<dyn StoryGenerator>`. Generation is best-effort:
//! the trait returns a [`Generation`], never an error.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ProviderSettings;
use crate::llm_client::{LlmError, VertexClient};

/// Outcome of one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Non-blank text and the model that produced it.
    Generated { text: String, model: String },
    Unavailable,
}

impl Generation {
    /// Keeps only text that is non-blank once trimmed.
    pub fn from_text(text: &str, model: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Generation::Unavailable
        } else {
            Generation::Generated {
                text: text.to_string(),
                model: model.to_string(),
            }
        }
    }
}

#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Generation;
}

/// Gemini via Vertex AI. Provider settings are re-read from the
/// environment on every call.
pub struct VertexGenerator {
    client: VertexClient,
}

impl VertexGenerator {
    pub fn new(client: VertexClient) -> Self {
        Self { client }
    }

    /// Generation against explicit settings. Every failure becomes
    /// `Unavailable`.
    pub async fn generate_with(&self, settings: &ProviderSettings, prompt: &str) -> Generation {
        match self.client.generate(settings, prompt).await {
            Ok(text) => Generation::from_text(&text, &settings.model),
            Err(LlmError::NotConfigured) => {
                debug!("Vertex project not configured; using fallback story");
                Generation::Unavailable
            }
            Err(e) => {
                warn!(model = %settings.model, "Story generation failed, using fallback: {e}");
                Generation::Unavailable
            }
        }
    }
}

#[async_trait]
impl StoryGenerator for VertexGenerator {
    async fn generate(&self, prompt: &str) -> Generation {
        let settings = ProviderSettings::from_env();
        self.generate_with(&settings, prompt).await
    }
}

/// Never calls a provider.
pub struct DisabledGenerator;

#[async_trait]
impl StoryGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Generation {
        Generation::Unavailable
    }
}
