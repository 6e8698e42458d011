//! Axum route handler for the Export API.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{default_file_base_name, export_document, ExportError};
use crate::models::resume::StructuredResume;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub resume: StructuredResume,
    /// Base name without extension. Defaults to `<Name>_Resume`.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// POST /api/v1/export/docx
///
/// Returns the resume as a `.docx` attachment.
pub async fn handle_export_docx(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let base_name = request
        .file_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| default_file_base_name(&request.resume));

    let resume = request.resume;
    let document = tokio::task::spawn_blocking(move || export_document(&resume, &base_name))
        .await
        .map_err(ExportError::from)??;

    info!(
        file_name = %document.file_name,
        size_bytes = document.bytes.len(),
        "Exported resume document"
    );

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
