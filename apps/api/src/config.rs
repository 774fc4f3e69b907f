use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CV_COLLECTION: &str = "uploaded_cvs";
const DEFAULT_JOBS_DATABASE_URL: &str = "sqlite://data/jobs_database.db";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub qdrant_endpoint: String,
    pub qdrant_api_key: Option<String>,
    pub cv_collection: String,
    pub jobs_database_url: String,
    /// LiveKit credentials are optional at startup; token issuance fails per request without them.
    pub livekit_api_key: Option<String>,
    pub livekit_api_secret: Option<String>,
    pub document_agent_url: Option<String>,
    pub search_agent_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            qdrant_endpoint: require_env("QDRANT_ENDPOINT")?,
            qdrant_api_key: optional_env("QDRANT_API_KEY"),
            cv_collection: optional_env("CV_COLLECTION")
                .unwrap_or_else(|| DEFAULT_CV_COLLECTION.to_string()),
            jobs_database_url: optional_env("JOBS_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_JOBS_DATABASE_URL.to_string()),
            livekit_api_key: optional_env("LIVEKIT_API_KEY"),
            livekit_api_secret: optional_env("LIVEKIT_API_SECRET"),
            document_agent_url: optional_env("DOCUMENT_AGENT_URL"),
            search_agent_url: optional_env("SEARCH_AGENT_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank variables the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// Configuration with every external endpoint unset or pointing nowhere.
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-openai-key".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            qdrant_endpoint: "http://127.0.0.1:9".to_string(),
            qdrant_api_key: None,
            cv_collection: DEFAULT_CV_COLLECTION.to_string(),
            jobs_database_url: "sqlite::memory:".to_string(),
            livekit_api_key: None,
            livekit_api_secret: None,
            document_agent_url: None,
            search_agent_url: None,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}
