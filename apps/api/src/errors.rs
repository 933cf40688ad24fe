use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::normalizer::{ExtractionFailure, FailureKind};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Document rejected: {0}")]
    Document(#[from] ExtractionFailure),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge("Upload exceeds the maximum request size".to_string());
        }
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Document(failure) => {
                let (status, code) = document_status(failure);
                (status, code, failure.user_message())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

/// Input problems are 400s; a parse that timed out or lost its worker is a 503.
pub fn document_status(failure: &ExtractionFailure) -> (StatusCode, &'static str) {
    match failure {
        ExtractionFailure::Extraction(e) if e.is_transient() => {
            (StatusCode::SERVICE_UNAVAILABLE, "EXTRACTION_UNAVAILABLE")
        }
        _ => match failure.kind() {
            FailureKind::UnsupportedType => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE_TYPE"),
            FailureKind::ExtractionError => (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
            FailureKind::EmptyContent => (StatusCode::BAD_REQUEST, "EMPTY_CONTENT"),
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
