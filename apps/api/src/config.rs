use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub deepgram_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Applied to every remote collaborator request (LLM, STT, TTS).
    pub upstream_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            deepgram_api_key: require_env("DEEPGRAM_API_KEY")?,
            port: optional_env("PORT", 8000_u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upstream_timeout: Duration::from_secs(
                optional_env("UPSTREAM_TIMEOUT_SECS", 60_u64)
                    .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024_usize)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
