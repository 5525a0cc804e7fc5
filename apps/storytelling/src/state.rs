use std::sync::Arc;

use crate::config::Config;
use crate::storytelling::generator::StoryGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable story generator. Default: VertexGenerator.
    pub generator: Arc<dyn StoryGenerator>,
}
