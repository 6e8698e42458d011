pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::layout::handlers as layout;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume optimization (three-stage pipeline)
        .route("/api/v1/resumes/optimize", post(generation::handle_optimize))
        .route(
            "/api/v1/resumes/optimize/upload",
            post(generation::handle_optimize_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Single-call operations
        .route("/api/v1/resumes/analyze", post(generation::handle_analyze))
        .route("/api/v1/resumes/enhance", post(generation::handle_enhance))
        // Layout estimate and reductions (no model calls)
        .route("/api/v1/layout/estimate", post(layout::handle_estimate))
        .route("/api/v1/layout/reduce", post(layout::handle_reduce))
        .route("/api/v1/layout/auto-reduce", post(layout::handle_auto_reduce))
        // Document export
        .route("/api/v1/export/docx", post(export::handle_export_docx))
        .fallback(not_found)
        .with_state(state)
}
