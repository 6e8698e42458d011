// Word document export of a StructuredResume.
// Packing is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod docx;
pub mod handlers;

use thiserror::Error;

pub use self::docx::{default_file_base_name, export_document};

/// The only failure message a caller ever sees for a failed export.
pub const EXPORT_FAILED_NOTICE: &str = "Could not generate the Word document. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document build failed: {0}")]
    Build(String),

    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
