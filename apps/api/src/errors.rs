use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::composer::ComposeError;
use crate::llm_client::LlmError;
use crate::store::StoreError;

/// Shown when the provider could not be reached at all.
pub const CONNECTIVITY_MESSAGE: &str =
    "Something went wrong reaching the AI provider. Please check your connection and try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Training data is locked: {0}")]
    Locked(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl From<ComposeError> for AppError {
    fn from(e: ComposeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Locked(msg) => (StatusCode::LOCKED, "TRAINING_LOCKED", msg.clone()),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(e) => llm_status(e),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Provider messages are passed through; transport details are not.
fn llm_status(e: &LlmError) -> (StatusCode, &'static str, String) {
    match e {
        LlmError::MissingCredential { .. } => {
            (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL", e.to_string())
        }
        LlmError::UnsupportedProvider(_) => {
            (StatusCode::BAD_REQUEST, "UNSUPPORTED_PROVIDER", e.to_string())
        }
        LlmError::Provider { message, .. } => {
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message.clone())
        }
        LlmError::Transport(detail) => {
            tracing::error!("LLM transport error: {detail}");
            (
                StatusCode::BAD_GATEWAY,
                "TRANSPORT_ERROR",
                CONNECTIVITY_MESSAGE.to_string(),
            )
        }
        LlmError::EmptyGeneration => (StatusCode::BAD_GATEWAY, "EMPTY_GENERATION", e.to_string()),
        LlmError::Cancelled => (StatusCode::CONFLICT, "CANCELLED", e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::llm_client::Provider;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_provider_error_passes_message_through() {
        let (status, body) = render(AppError::Llm(LlmError::Provider {
            status: 401,
            message: "bad key".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
        assert_eq!(body["error"]["message"], "bad key");
    }

    #[tokio::test]
    async fn test_transport_error_uses_generic_message() {
        let (status, body) = render(AppError::Llm(LlmError::Transport(
            "dns error: no such host".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");
        assert_eq!(body["error"]["message"], CONNECTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_credential_is_client_error() {
        let (status, body) = render(AppError::Llm(LlmError::MissingCredential {
            provider: Provider::Groq,
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
    }

    #[tokio::test]
    async fn test_empty_job_description_is_validation_error() {
        let (status, body) = render(ComposeError::EmptyJobDescription.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_locked_maps_to_423() {
        let (status, body) = render(AppError::Locked("unlock first".to_string())).await;
        assert_eq!(status, StatusCode::LOCKED);
        assert_eq!(body["error"]["code"], "TRAINING_LOCKED");
    }
}
