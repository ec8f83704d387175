use anyhow::{Context, Result};

use crate::llm_client::provider::{ProviderEndpoints, GEMINI_BASE_URL, GROQ_BASE_URL, OPENAI_BASE_URL};
use crate::llm_client::DEFAULT_TEMPERATURE;

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: without `DATABASE_URL` the service runs
/// on the in-memory store, and without `GEMINI_API_KEY` every caller must
/// bring their own key.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    /// Application default key, used for Gemini only when the caller sends none.
    pub gemini_api_key: Option<String>,
    pub endpoints: ProviderEndpoints,
    pub llm_timeout_secs: u64,
    pub llm_temperature: f32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            endpoints: ProviderEndpoints {
                gemini: optional_env("GEMINI_BASE_URL")
                    .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
                openai: optional_env("OPENAI_BASE_URL")
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
                groq: optional_env("GROQ_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            },
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_temperature: parse_env("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
