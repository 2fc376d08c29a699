use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::llm_client::GenerationError;

/// Shown when the model answers without any text. The caller is expected to retry.
pub const EMPTY_RESPONSE_MESSAGE: &str = "AI không trả về kết quả. Vui lòng thử lại.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Generation in progress: {0}")]
    Conflict(String),

    #[error("LLM returned no text")]
    EmptyResponse,

    #[error("LLM transport error: {0}")]
    Transport(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat(msg) => AppError::UnsupportedFormat(msg),
            IngestError::Extraction(msg) => AppError::Extraction(msg),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::EmptyResponse => AppError::EmptyResponse,
            GenerationError::Transport(msg) => AppError::Transport(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::Extraction(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "GENERATION_IN_PROGRESS", msg.clone()),
            AppError::EmptyResponse => {
                tracing::warn!("LLM returned an empty response");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMPTY_RESPONSE",
                    EMPTY_RESPONSE_MESSAGE.to_string(),
                )
            }
            AppError::Transport(msg) => {
                tracing::error!("LLM transport error: {msg}");
                // Upstream message is forwarded verbatim.
                (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_errors_keep_their_message() {
        let err: AppError = IngestError::UnsupportedFormat("bad.exe".to_string()).into();
        assert!(matches!(err, AppError::UnsupportedFormat(ref m) if m == "bad.exe"));

        let err: AppError = IngestError::Extraction("broken zip".to_string()).into();
        assert!(matches!(err, AppError::Extraction(ref m) if m == "broken zip"));
    }

    #[test]
    fn test_generation_errors_map_to_gateway_statuses() {
        let empty: AppError = GenerationError::EmptyResponse.into();
        assert_eq!(empty.into_response().status(), StatusCode::BAD_GATEWAY);

        let transport: AppError = GenerationError::Transport("quota exceeded".to_string()).into();
        assert_eq!(transport.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_status_codes_per_variant() {
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedFormat("x".into()).into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::Extraction("x".into()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
