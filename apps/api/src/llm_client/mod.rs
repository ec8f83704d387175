//! LLM Client — the single point of entry for all provider calls in JobGenie.
//!
//! ARCHITECTURAL RULE: No other module may call Gemini, OpenAI or Groq directly.
//! All LLM interactions MUST go through this module.
//!
//! One call, one request: there is no retry or backoff here. A failed call is
//! classified and handed back so the caller can resubmit unchanged.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod prompts;
pub mod provider;
pub mod transport;

pub use provider::{ApiConfig, Provider, ProviderEndpoints};
use provider::{extract_error_message, extract_text, ProviderRequest, RequestParts};
use transport::HttpTransport;

/// Sampling temperature used when nothing else is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured for provider '{provider}'")]
    MissingCredential { provider: Provider },

    #[error("Unsupported provider '{0}'")]
    UnsupportedProvider(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Provider returned no usable text")]
    EmptyGeneration,

    #[error("Generation was superseded by a newer request")]
    Cancelled,
}

/// Application-level fallback credentials, injected at startup.
/// Only Gemini may fall back to an application key.
#[derive(Debug, Clone, Default)]
pub struct DefaultCredentials {
    pub gemini_api_key: Option<String>,
}

/// Everything the dispatcher needs besides the transport.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub defaults: DefaultCredentials,
    pub endpoints: ProviderEndpoints,
    pub temperature: f32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            defaults: DefaultCredentials::default(),
            endpoints: ProviderEndpoints::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            defaults: DefaultCredentials {
                gemini_api_key: config.gemini_api_key.clone(),
            },
            endpoints: config.endpoints.clone(),
            temperature: config.llm_temperature,
        }
    }
}

/// Provider, key and model after validation. Never leaves this module.
struct ResolvedTarget {
    provider: Provider,
    api_key: String,
    model: String,
}

/// The single LLM client used by all services in JobGenie.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn HttpTransport>,
    settings: DispatchSettings,
}

impl LlmClient {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: DispatchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Provider used when the caller sends no `ApiConfig` at all.
    pub fn default_provider(&self) -> Provider {
        Provider::Gemini
    }

    /// Sends `prompt` with `system` to the provider selected by `config`
    /// and returns the generated text.
    ///
    /// Validation failures (unknown provider, missing key) return before any
    /// network I/O. If `cancel` fires while the request is in flight the
    /// call resolves to `LlmError::Cancelled` and the reply is discarded.
    pub async fn generate(
        &self,
        prompt: &str,
        system: &str,
        config: Option<&ApiConfig>,
        cancel: &CancellationToken,
    ) -> Result<String, LlmError> {
        debug!("dispatch: validating");
        let target = self.resolve(config)?;

        if cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }

        let request = ProviderRequest::build(
            &self.settings.endpoints,
            RequestParts {
                provider: target.provider,
                api_key: &target.api_key,
                model: &target.model,
                prompt,
                system,
                temperature: self.settings.temperature,
            },
        )
        .into_http();

        debug!(
            "dispatch: requesting provider={} model={}",
            target.provider, target.model
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("dispatch: cancelled provider={}", target.provider);
                return Err(LlmError::Cancelled);
            }
            result = self.transport.post_json(request) => result,
        };

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("dispatch: transport failure provider={}: {e}", target.provider);
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = extract_error_message(response.status, &response.body);
            warn!(
                "dispatch: provider={} returned {}: {}",
                target.provider, response.status, message
            );
            return Err(LlmError::Provider {
                status: response.status,
                message,
            });
        }

        let text = extract_text(target.provider, &response.body)?;
        debug!(
            "dispatch: succeeded provider={} chars={}",
            target.provider,
            text.len()
        );
        Ok(text)
    }

    fn resolve(&self, config: Option<&ApiConfig>) -> Result<ResolvedTarget, LlmError> {
        let (provider, user_key, model_override) = match config {
            Some(c) => (c.provider.parse::<Provider>()?, c.api_key.trim(), c.model.as_deref()),
            None => (self.default_provider(), "", None),
        };

        let api_key = if !user_key.is_empty() {
            user_key.to_string()
        } else {
            match provider {
                Provider::Gemini => self
                    .settings
                    .defaults
                    .gemini_api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .ok_or(LlmError::MissingCredential { provider })?,
                Provider::OpenAi | Provider::Groq => {
                    return Err(LlmError::MissingCredential { provider })
                }
            }
        };

        let model = model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(provider.default_model())
            .to_string();

        Ok(ResolvedTarget {
            provider,
            api_key,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::transport::spy::SpyTransport;
    use super::*;

    fn client_with(spy: Arc<SpyTransport>, gemini_default: Option<&str>) -> LlmClient {
        LlmClient::new(
            spy,
            DispatchSettings {
                defaults: DefaultCredentials {
                    gemini_api_key: gemini_default.map(str::to_string),
                },
                ..DispatchSettings::default()
            },
        )
    }

    fn gemini_ok(text: &str) -> String {
        serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
            .to_string()
    }

    #[tokio::test]
    async fn test_openai_without_key_fails_before_network() {
        let spy = Arc::new(SpyTransport::replying(200, "{}"));
        let client = client_with(spy.clone(), Some("app-default"));
        let config = ApiConfig::new(Provider::OpenAi, "");

        let err = client
            .generate("p", "s", Some(&config), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LlmError::MissingCredential {
                provider: Provider::OpenAi
            }
        ));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn test_groq_whitespace_key_counts_as_missing() {
        let spy = Arc::new(SpyTransport::replying(200, "{}"));
        let client = client_with(spy.clone(), None);
        let config = ApiConfig::new(Provider::Groq, "   ");

        let err = client
            .generate("p", "s", Some(&config), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::MissingCredential { .. }));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_provider_fails_before_network() {
        let spy = Arc::new(SpyTransport::replying(200, "{}"));
        let client = client_with(spy.clone(), Some("app-default"));
        let config = ApiConfig {
            provider: "unknown".to_string(),
            api_key: "k".to_string(),
            model: None,
        };

        let err = client
            .generate("p", "s", Some(&config), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::UnsupportedProvider(_)));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gemini_falls_back_to_default_key() {
        let spy = Arc::new(SpyTransport::replying(200, gemini_ok("Hi there, ...")));
        let client = client_with(spy.clone(), Some("app-default"));

        let text = client
            .generate("p", "s", None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, "Hi there, ...");
        let calls = spy.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].headers,
            vec![("x-goog-api-key", "app-default".to_string())]
        );
    }

    #[tokio::test]
    async fn test_gemini_user_key_wins_over_default() {
        let spy = Arc::new(SpyTransport::replying(200, gemini_ok("ok")));
        let client = client_with(spy.clone(), Some("app-default"));
        let config = ApiConfig::new(Provider::Gemini, "user-key");

        client
            .generate("p", "s", Some(&config), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            spy.calls()[0].headers,
            vec![("x-goog-api-key", "user-key".to_string())]
        );
    }

    #[tokio::test]
    async fn test_gemini_without_any_key_is_missing_credential() {
        let spy = Arc::new(SpyTransport::replying(200, gemini_ok("ok")));
        let client = client_with(spy.clone(), None);

        let err = client
            .generate("p", "s", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LlmError::MissingCredential {
                provider: Provider::Gemini
            }
        ));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gemini_empty_text_is_empty_generation() {
        let spy = Arc::new(SpyTransport::replying(200, gemini_ok("")));
        let client = client_with(spy.clone(), Some("app-default"));

        let err = client
            .generate("p", "s", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::EmptyGeneration));
        assert_eq!(spy.call_count(), 1);
    }

    #[tokio::test]
    async fn test_openai_success_returns_content() {
        let spy = Arc::new(SpyTransport::replying(
            200,
            r#"{"choices":[{"message":{"content":"X"}}]}"#,
        ));
        let client = client_with(spy.clone(), None);
        let config = ApiConfig::new(Provider::OpenAi, "sk-1");

        let text = client
            .generate("prompt", "system", Some(&config), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, "X");
        let calls = spy.calls();
        assert_eq!(calls[0].url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(
            calls[0].headers,
            vec![("authorization", "Bearer sk-1".to_string())]
        );
        assert_eq!(calls[0].body["model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_model_override_is_used() {
        let spy = Arc::new(SpyTransport::replying(
            200,
            r#"{"choices":[{"message":{"content":"X"}}]}"#,
        ));
        let client = client_with(spy.clone(), None);
        let mut config = ApiConfig::new(Provider::Groq, "gsk");
        config.model = Some("mixtral-8x7b".to_string());

        client
            .generate("p", "s", Some(&config), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(spy.calls()[0].body["model"], "mixtral-8x7b");
    }

    #[tokio::test]
    async fn test_non_success_status_carries_provider_message() {
        let spy = Arc::new(SpyTransport::replying(
            401,
            r#"{"error":{"message":"bad key"}}"#,
        ));
        let client = client_with(spy.clone(), None);
        let config = ApiConfig::new(Provider::OpenAi, "sk-wrong");

        let err = client
            .generate("p", "s", Some(&config), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            LlmError::Provider { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
        assert_eq!(spy.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let spy = Arc::new(SpyTransport::failing("connection refused"));
        let client = client_with(spy.clone(), Some("app-default"));

        let err = client
            .generate("p", "s", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Transport(ref m) if m == "connection refused"));
        assert_eq!(spy.call_count(), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_network() {
        let spy = Arc::new(SpyTransport::replying(200, gemini_ok("ok")));
        let client = client_with(spy.clone(), Some("app-default"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client.generate("p", "s", None, &cancel).await.unwrap_err();

        assert!(matches!(err, LlmError::Cancelled));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_request_discards_reply() {
        let spy = Arc::new(
            SpyTransport::replying(200, gemini_ok("stale")).delayed(Duration::from_secs(5)),
        );
        let client = client_with(spy.clone(), Some("app-default"));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = client.generate("p", "s", None, &cancel).await.unwrap_err();
        assert!(matches!(err, LlmError::Cancelled));
        assert_eq!(spy.call_count(), 1);
    }
}
