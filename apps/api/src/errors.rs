use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::media::DataUriError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every flow failure surfaces as one of these immediately; nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request, or the model's structured answer, does not match its schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The model call errored, timed out, or was unreachable.
    #[error("Model invocation error: {0}")]
    ModelInvocation(String),

    /// The model call succeeded but produced nothing usable.
    #[error("Model returned an empty result")]
    EmptyResult,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => AppError::EmptyResult,
            LlmError::Parse(e) => {
                AppError::Validation(format!("model response is not valid JSON: {e}"))
            }
            other => AppError::ModelInvocation(other.to_string()),
        }
    }
}

impl From<DataUriError> for AppError {
    fn from(err: DataUriError) -> Self {
        AppError::Validation(format!("photo: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ModelInvocation(msg) => {
                tracing::error!("Model invocation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MODEL_INVOCATION_ERROR",
                    "The AI model could not be reached. Please try again.".to_string(),
                )
            }
            AppError::EmptyResult => {
                tracing::error!("Model returned an empty result");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMPTY_RESULT",
                    "The AI model returned no usable result".to_string(),
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
