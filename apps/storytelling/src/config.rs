use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_PORT: u16 = 8009;
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Service configuration loaded once at startup from environment variables.
/// Fails startup if a set variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Parsed `CORS_ALLOW_ORIGINS`. `None` means every origin is allowed.
    pub cors_allow_origins: Option<Vec<String>>,
    pub llm_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_timeout_secs = match std::env::var("LLM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        if llm_timeout_secs == 0 {
            bail!("LLM_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_allow_origins: parse_origins(
                &std::env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
        })
    }
}

/// Splits a comma-separated allow-list. A `*` entry anywhere (or an empty
/// list) opens CORS to every origin.
pub fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}

/// Vertex AI settings. Unlike [`Config`] these are re-read on every
/// generation attempt, so a project can be configured without a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub project: Option<String>,
    pub location: String,
    pub model: String,
    pub access_token: Option<String>,
    pub endpoint: Option<String>,
}

impl ProviderSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        ProviderSettings {
            project: get("GOOGLE_CLOUD_PROJECT"),
            location: get("VERTEXAI_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            model: get("VERTEXAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            access_token: get("VERTEXAI_ACCESS_TOKEN"),
            endpoint: get("VERTEXAI_ENDPOINT"),
        }
    }

    /// Base URL of the regional Vertex AI API.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}
