//! Provider catalogue: which services we can dispatch to, how each one
//! wants its request, and how each one shapes its reply.
//!
//! Adding a provider means a new `Provider` variant; every `match` below is
//! exhaustive so the compiler points at each place that needs a branch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::transport::HttpRequest;
use super::LlmError;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "groq")]
    Groq,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Groq => "llama-3.3-70b-versatile",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            _ => Err(LlmError::UnsupportedProvider(id.to_string())),
        }
    }
}

/// Per-request provider selection, as stored by the browser.
///
/// `provider` stays a raw string so an unknown id reaches the dispatcher
/// and fails there with `UnsupportedProvider` instead of a JSON reject.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub provider: String,
    #[serde(default, alias = "apiKey")]
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl ApiConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.as_str().to_string(),
            api_key: api_key.into(),
            model: None,
        }
    }
}

// Keys stay out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("model", &self.model)
            .finish()
    }
}

/// Base URLs for every provider. Overridable so staging proxies work.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub gemini: String,
    pub openai: String,
    pub groq: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            gemini: GEMINI_BASE_URL.to_string(),
            openai: OPENAI_BASE_URL.to_string(),
            groq: GROQ_BASE_URL.to_string(),
        }
    }
}

impl ProviderEndpoints {
    fn base_for(&self, provider: Provider) -> &str {
        let base = match provider {
            Provider::Gemini => &self.gemini,
            Provider::OpenAi => &self.openai,
            Provider::Groq => &self.groq,
        };
        base.trim_end_matches('/')
    }
}

/// One provider call, fully resolved: key checked, model chosen.
#[derive(Debug, Clone)]
pub enum ProviderRequest {
    /// `models/{model}:generateContent` with a separate system instruction.
    Gemini { url: String, api_key: String, body: serde_json::Value },
    /// OpenAI-compatible `chat/completions` (OpenAI and Groq).
    ChatCompletions { url: String, api_key: String, body: serde_json::Value },
}

pub struct RequestParts<'a> {
    pub provider: Provider,
    pub api_key: &'a str,
    pub model: &'a str,
    pub prompt: &'a str,
    pub system: &'a str,
    pub temperature: f32,
}

impl ProviderRequest {
    pub fn build(endpoints: &ProviderEndpoints, parts: RequestParts<'_>) -> Self {
        let base = endpoints.base_for(parts.provider);
        match parts.provider {
            Provider::Gemini => ProviderRequest::Gemini {
                url: format!("{base}/models/{}:generateContent", parts.model),
                api_key: parts.api_key.to_string(),
                body: json!({
                    "systemInstruction": { "parts": [{ "text": parts.system }] },
                    "contents": [{ "role": "user", "parts": [{ "text": parts.prompt }] }],
                    "generationConfig": { "temperature": parts.temperature },
                }),
            },
            Provider::OpenAi | Provider::Groq => ProviderRequest::ChatCompletions {
                url: format!("{base}/chat/completions"),
                api_key: parts.api_key.to_string(),
                body: json!({
                    "model": parts.model,
                    "messages": [
                        { "role": "system", "content": parts.system },
                        { "role": "user", "content": parts.prompt },
                    ],
                    "temperature": parts.temperature,
                }),
            },
        }
    }

    pub fn into_http(self) -> HttpRequest {
        match self {
            ProviderRequest::Gemini { url, api_key, body } => HttpRequest {
                url,
                headers: vec![("x-goog-api-key", api_key)],
                body,
            },
            ProviderRequest::ChatCompletions { url, api_key, body } => HttpRequest {
                url,
                headers: vec![("authorization", format!("Bearer {api_key}"))],
                body,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// `{"error": {"message": ...}}` — shared by all three providers.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pulls the first text payload out of a 2xx body.
/// Unparseable or blank payloads count as an empty generation.
pub fn extract_text(provider: Provider, body: &str) -> Result<String, LlmError> {
    let text = match provider {
        Provider::Gemini => serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.candidates.into_iter().next())
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            }),
        Provider::OpenAi | Provider::Groq => serde_json::from_str::<ChatResponse>(body)
            .ok()
            .and_then(|r| r.choices.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content),
    };

    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(LlmError::EmptyGeneration),
    }
}

/// Best human-readable message for a non-2xx reply.
///
/// Only a provider error envelope is passed on. Anything else (proxy HTML
/// pages, plain-text gateway errors) collapses to the status line.
pub fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("provider returned HTTP {status}"))
}
