use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::{ExportError, EXPORT_FAILED_NOTICE};
use crate::generation::pipeline::PipelineError;
use crate::ingest::IngestError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Any failed model stage. Details are logged, never returned.
    #[error("Pipeline error: {0}")]
    Pipeline(PipelineError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Input(msg) => AppError::Validation(msg),
            failed => AppError::Pipeline(failed),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(error: IngestError) -> Self {
        AppError::Validation(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(e) => {
                tracing::error!("Pipeline error: {e:?}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PIPELINE_ERROR",
                    e.user_message().to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    EXPORT_FAILED_NOTICE.to_string(),
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
