use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_MAX_REQUEST_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the external resume analysis service, e.g. `http://localhost:5000`.
    pub analysis_api_url: String,
    /// HS256 secret used to verify session tokens.
    pub session_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Largest single resume file accepted by the upload surfaces.
    pub max_upload_bytes: usize,
    /// Body limit applied to multipart upload routes.
    pub max_request_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            analysis_api_url: require_env("ANALYSIS_API_URL")?,
            session_secret: require_env("SESSION_SECRET")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: optional_usize("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_request_bytes: optional_usize("MAX_REQUEST_BYTES", DEFAULT_MAX_REQUEST_BYTES)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_usize(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("{key} must be a byte count")),
        Err(_) => Ok(default),
    }
}
