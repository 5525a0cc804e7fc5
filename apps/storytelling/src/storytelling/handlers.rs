//! Axum route handlers for the Storytelling API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storytelling::fallback::{fallback_story, FALLBACK_MODEL};
use crate::storytelling::generator::{Generation, StoryGenerator};
use crate::storytelling::models::{StoryRequest, StoryResponse};
use crate::storytelling::prompts::build_story_prompt;

/// POST /storytelling/generate
///
/// Validates the product metadata, tries the configured model once and
/// falls back to the template narrative. Only validation errors reach the
/// caller; every validated request gets a 200 with a story.
pub async fn handle_generate_story(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StoryResponse>, AppError> {
    // An unreadable body carries no product; it fails the same way as a missing one.
    let Json(body) = payload.map_err(|e| {
        AppError::invalid_field("product", format!("field required: {}", e.body_text()))
    })?;
    let request = StoryRequest::from_json(body)?;

    let span = info_span!("generate_story", request_id = %Uuid::new_v4());
    let response = generate_story(state.generator.as_ref(), &request)
        .instrument(span)
        .await;

    Ok(Json(response))
}

/// Runs prompt → generation → (fallback) for an already validated request.
pub async fn generate_story(
    generator: &dyn StoryGenerator,
    request: &StoryRequest,
) -> StoryResponse {
    let prompt = build_story_prompt(request);
    let generation = generator.generate(&prompt).await;

    let response = assemble_response(request, generation);
    info!(
        model = %response.model,
        tags = response.tags.len(),
        "Story ready for '{}'",
        request.product
    );
    response
}

/// Packs the chosen story and echoed metadata. `heritage` mirrors `region`.
pub fn assemble_response(request: &StoryRequest, generation: Generation) -> StoryResponse {
    let (story, model) = match generation {
        Generation::Generated { text, model } => (text, model),
        Generation::Unavailable => (fallback_story(request), FALLBACK_MODEL.to_string()),
    };

    StoryResponse {
        story,
        product: request.product.clone(),
        heritage: request.region.clone(),
        technique: request.technique.clone(),
        tags: request.tags(),
        model,
    }
}
