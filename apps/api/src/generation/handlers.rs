//! Axum route handlers for the Resume Optimization API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::pipeline::{
    analyze_match, build_optimized_resume, build_standard_resume, PipelineInput,
};
use crate::ingest::{extract_resume_text, UploadedFile};
use crate::layout::estimator::{estimate, LayoutEstimate};
use crate::models::match_analysis::{MatchAnalysis, MatchBand};
use crate::models::resume::StructuredResume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub resume: StructuredResume,
    pub layout: LayoutEstimate,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MatchReportResponse {
    pub report: MatchAnalysis,
    pub band: MatchBand,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/optimize
///
/// Runs the three-stage pipeline on raw resume text and returns the tailored
/// resume together with its layout estimate.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    optimize(&state, &request.resume_text, &request.jd_text)
        .await
        .map(Json)
}

/// POST /api/v1/resumes/optimize/upload
///
/// Multipart form: `resume` (PDF or text file) and `jd_text`.
pub async fn handle_optimize_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OptimizeResponse>, AppError> {
    let mut resume_file: Option<UploadedFile> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume file: {e}")))?;
                resume_file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("jd_text") => {
                jd_text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Could not read jd_text: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let resume_file = resume_file
        .ok_or_else(|| AppError::Validation("Missing multipart field 'resume'".to_string()))?;
    let jd_text =
        jd_text.ok_or_else(|| AppError::Validation("Missing multipart field 'jd_text'".to_string()))?;

    let resume_text = extract_resume_text(resume_file).await?;
    optimize(&state, &resume_text, &jd_text).await.map(Json)
}

/// POST /api/v1/resumes/analyze
///
/// Scores the resume against the job description without rewriting it.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<MatchReportResponse>, AppError> {
    let report = analyze_match(
        state.llm.as_ref(),
        pipeline_input(&state, &request.resume_text, &request.jd_text),
    )
    .await?;

    Ok(Json(MatchReportResponse {
        band: report.match_score.band(),
        report,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/resumes/enhance
///
/// Single-call alternative to `/optimize`: edits the resume in place.
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let resume = build_standard_resume(
        state.llm.as_ref(),
        pipeline_input(&state, &request.resume_text, &request.jd_text),
    )
    .await?;
    let layout = estimate(&resume, &state.page_metrics);

    Ok(Json(OptimizeResponse {
        resume,
        layout,
        generated_at: Utc::now(),
    }))
}

fn pipeline_input<'a>(state: &AppState, resume_text: &'a str, jd_text: &'a str) -> PipelineInput<'a> {
    PipelineInput {
        resume_text,
        jd_text,
        max_input_chars: state.config.max_input_chars,
    }
}

async fn optimize(
    state: &AppState,
    resume_text: &str,
    jd_text: &str,
) -> Result<OptimizeResponse, AppError> {
    let resume = build_optimized_resume(
        state.llm.as_ref(),
        &state.page_metrics,
        pipeline_input(state, resume_text, jd_text),
    )
    .await?;
    let layout = estimate(&resume, &state.page_metrics);

    Ok(OptimizeResponse {
        resume,
        layout,
        generated_at: Utc::now(),
    })
}
