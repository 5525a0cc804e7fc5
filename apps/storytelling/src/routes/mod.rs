pub mod health;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::state::AppState;
use crate::storytelling::handlers;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/storytelling/generate",
            post(handlers::handle_generate_story),
        )
        .with_state(state)
        .layer(cors)
}

/// Credentialed CORS. Origins, methods and headers are mirrored from the
/// request because a literal `*` cannot be combined with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins = match &config.cors_allow_origins {
        None => AllowOrigin::mirror_request(),
        Some(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| warn!("Ignoring invalid CORS origin '{origin}'"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
