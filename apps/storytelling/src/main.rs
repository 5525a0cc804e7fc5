mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod storytelling;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ProviderSettings};
use crate::llm_client::VertexClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storytelling::generator::{DisabledGenerator, StoryGenerator, VertexGenerator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Storytelling service v{}", env!("CARGO_PKG_VERSION"));

    let generator: Arc<dyn StoryGenerator> = match VertexClient::new(config.llm_timeout) {
        Ok(client) => {
            let provider = ProviderSettings::from_env();
            match &provider.project {
                Some(project) => info!(
                    "Vertex AI generation enabled (project: {project}, model: {})",
                    provider.model
                ),
                None => info!("GOOGLE_CLOUD_PROJECT not set; stories use the fallback narrative"),
            }
            Arc::new(VertexGenerator::new(client))
        }
        Err(e) => {
            warn!("Could not build Vertex AI client, generation disabled: {e}");
            Arc::new(DisabledGenerator)
        }
    };

    match &config.cors_allow_origins {
        Some(origins) => info!("CORS allow-list: {}", origins.join(", ")),
        None => info!("CORS open to all origins"),
    }

    let state = AppState {
        config: config.clone(),
        generator,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Storytelling service stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
