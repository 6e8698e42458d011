//! Axum route handlers for the Layout API.
//!
//! All three endpoints are pure: no model calls, the input resume is returned
//! untouched alongside any reduced copy.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::estimator::{estimate, LayoutEstimate};
use crate::layout::reducer::{auto_reduce, reduce, ReductionSelection};
use crate::models::resume::StructuredResume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub resume: StructuredResume,
}

#[derive(Debug, Deserialize)]
pub struct ReduceRequest {
    pub resume: StructuredResume,
    #[serde(default)]
    pub selection: ReductionSelection,
}

#[derive(Debug, Serialize)]
pub struct ReduceResponse {
    pub resume: StructuredResume,
    pub before: LayoutEstimate,
    pub after: LayoutEstimate,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout/estimate
pub async fn handle_estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Json<LayoutEstimate> {
    Json(estimate(&request.resume, &state.page_metrics))
}

/// POST /api/v1/layout/reduce
///
/// Applies the user's selected reductions and reports the estimate before and after.
pub async fn handle_reduce(
    State(state): State<AppState>,
    Json(request): Json<ReduceRequest>,
) -> Json<ReduceResponse> {
    let reduced = reduce(&request.resume, &request.selection);
    Json(compare(&state, &request.resume, reduced))
}

/// POST /api/v1/layout/auto-reduce
///
/// Applies every reduction the estimate currently suggests.
pub async fn handle_auto_reduce(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Json<ReduceResponse> {
    let reduced = auto_reduce(&request.resume);
    Json(compare(&state, &request.resume, reduced))
}

fn compare(state: &AppState, original: &StructuredResume, reduced: StructuredResume) -> ReduceResponse {
    let before = estimate(original, &state.page_metrics);
    let after = estimate(&reduced, &state.page_metrics);
    debug!(
        before_pages = before.estimated_page_count,
        after_pages = after.estimated_page_count,
        "layout reduced"
    );
    ReduceResponse {
        resume: reduced,
        before,
        after,
    }
}
