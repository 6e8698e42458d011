//! Resume ingestion: turns an uploaded file into plain text for the pipeline.
//!
//! PDFs (by content type, `.pdf` name or `%PDF` magic) go through `pdf-extract`
//! on the blocking pool, since extraction is CPU-bound and can panic on
//! malformed input. Everything else must be UTF-8 text.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF";
const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("uploaded resume file is empty")]
    Empty,

    #[error("could not read text from the uploaded PDF: {0}")]
    Pdf(String),

    #[error("uploaded resume must be a PDF or UTF-8 text file")]
    NotText,

    #[error("no readable text found in the uploaded resume")]
    NoText,
}

/// An uploaded resume file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn is_pdf(&self) -> bool {
        self.data.starts_with(PDF_MAGIC)
            || self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
    }
}

/// Extracts the resume text from an uploaded file.
pub async fn extract_resume_text(file: UploadedFile) -> Result<String, IngestError> {
    if file.data.is_empty() {
        return Err(IngestError::Empty);
    }

    let text = if file.is_pdf() {
        let data = file.data.clone();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| IngestError::Pdf(e.to_string()))?
            .map_err(|e| IngestError::Pdf(e.to_string()))?
    } else {
        String::from_utf8(file.data.to_vec()).map_err(|_| IngestError::NotText)?
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(IngestError::NoText);
    }
    debug!(chars = text.chars().count(), pdf = file.is_pdf(), "Extracted resume text");
    Ok(text)
}

/// Trims each line and collapses runs of blank lines left behind by PDF extraction.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line.trim_start());
        blank_run = 0;
    }
    out
}
