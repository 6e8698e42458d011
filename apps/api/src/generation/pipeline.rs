//! Pipeline Orchestrator: analysis → generation → layout, strictly sequential.
//!
//! Each stage's prompt is built only after the previous stage's response has been
//! validated. Retries belong to the gateway; the pipeline makes one logical attempt
//! and any stage failure aborts the whole run with a single generic error.
//!
//! The layout stage is given the locally measured estimate of the draft so the
//! model does not have to guess the page density.
//!
//! Two single-call operations share the same input checks and error handling:
//! the ATS match report and the standard builder.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::prompts::{
    build_analysis_prompt, build_generation_prompt, build_match_analysis_prompt,
    build_standard_resume_prompt,
};
use crate::layout::estimator::estimate;
use crate::layout::metrics::PageMetrics;
use crate::layout::prompts::build_layout_prompt_with_estimate;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_typed, LlmError, LlmGateway};
use crate::models::analysis::ResumeAnalysis;
use crate::models::match_analysis::MatchAnalysis;
use crate::models::resume::StructuredResume;

/// The only failure message a caller ever sees for a failed stage.
pub const PIPELINE_FAILED_MESSAGE: &str = "Failed to build the optimized resume. Please try again.";
pub const MATCH_ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze the resume. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Analysis,
    Generation,
    Layout,
    MatchAnalysis,
    StandardBuild,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Analysis => "analysis",
            PipelineStage::Generation => "generation",
            PipelineStage::Layout => "layout",
            PipelineStage::MatchAnalysis => "match_analysis",
            PipelineStage::StandardBuild => "standard_build",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected before any model call.
    #[error("{0}")]
    Input(String),

    /// A stage failed. The stage and source are for logs only.
    #[error("{stage} stage failed: {source}")]
    Failed {
        stage: PipelineStage,
        #[source]
        source: LlmError,
    },
}

impl PipelineError {
    /// What the caller is told. Stage failures never expose their source.
    pub fn user_message(&self) -> &str {
        match self {
            PipelineError::Input(msg) => msg.as_str(),
            PipelineError::Failed {
                stage: PipelineStage::MatchAnalysis,
                ..
            } => MATCH_ANALYSIS_FAILED_MESSAGE,
            PipelineError::Failed { .. } => PIPELINE_FAILED_MESSAGE,
        }
    }
}

/// Inputs and limits for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineInput<'a> {
    pub resume_text: &'a str,
    pub jd_text: &'a str,
    /// Per-field character cap.
    pub max_input_chars: usize,
}

/// Builds the tailored resume. Sends exactly three gateway requests on success.
pub async fn build_optimized_resume(
    gateway: &dyn LlmGateway,
    metrics: &PageMetrics,
    input: PipelineInput<'_>,
) -> Result<StructuredResume, PipelineError> {
    validate_input("resume_text", input.resume_text, input.max_input_chars)?;
    validate_input("jd_text", input.jd_text, input.max_input_chars)?;

    let run_id = Uuid::new_v4();
    let run_start = Instant::now();
    info!(%run_id, "Starting resume optimization pipeline");

    // ── Stage 1: analysis ───────────────────────────────────────────────────
    let stage_start = Instant::now();
    let analysis: ResumeAnalysis = call_typed(
        gateway,
        &build_analysis_prompt(input.resume_text, input.jd_text),
        JSON_ONLY_SYSTEM,
    )
    .await
    .map_err(|source| stage_failed(PipelineStage::Analysis, source))?;
    info!(
        %run_id,
        stage = %PipelineStage::Analysis,
        elapsed_ms = stage_start.elapsed().as_millis() as u64,
        pattern = analysis.pattern_analysis.pattern.label(),
        "Stage complete"
    );

    let analysis_json = serde_json::to_string(&analysis)
        .map_err(|e| stage_failed(PipelineStage::Generation, LlmError::Parse(e)))?;
    let keep_work_history = analysis.source_has_work_history();

    // ── Stage 2: generation ─────────────────────────────────────────────────
    let stage_start = Instant::now();
    let mut draft: StructuredResume = call_typed(
        gateway,
        &build_generation_prompt(input.resume_text, input.jd_text, &analysis_json),
        JSON_ONLY_SYSTEM,
    )
    .await
    .map_err(|source| stage_failed(PipelineStage::Generation, source))?;
    enforce_no_fabricated_work_history(&mut draft, keep_work_history, run_id, PipelineStage::Generation);
    info!(
        %run_id,
        stage = %PipelineStage::Generation,
        elapsed_ms = stage_start.elapsed().as_millis() as u64,
        "Stage complete"
    );

    // ── Stage 3: layout ─────────────────────────────────────────────────────
    let stage_start = Instant::now();
    let draft_estimate = estimate(&draft, metrics);
    let draft_json = serde_json::to_string(&draft)
        .map_err(|e| stage_failed(PipelineStage::Layout, LlmError::Parse(e)))?;
    let mut final_resume: StructuredResume = call_typed(
        gateway,
        &build_layout_prompt_with_estimate(&draft_json, Some(&analysis_json), &draft_estimate),
        JSON_ONLY_SYSTEM,
    )
    .await
    .map_err(|source| stage_failed(PipelineStage::Layout, source))?;
    enforce_no_fabricated_work_history(&mut final_resume, keep_work_history, run_id, PipelineStage::Layout);
    info!(
        %run_id,
        stage = %PipelineStage::Layout,
        elapsed_ms = stage_start.elapsed().as_millis() as u64,
        draft_pages = draft_estimate.estimated_page_count,
        "Stage complete"
    );

    info!(
        %run_id,
        total_ms = run_start.elapsed().as_millis() as u64,
        "Resume optimization pipeline finished"
    );
    Ok(final_resume)
}

/// Scores the source resume against the job description. One gateway request.
pub async fn analyze_match(
    gateway: &dyn LlmGateway,
    input: PipelineInput<'_>,
) -> Result<MatchAnalysis, PipelineError> {
    validate_input("resume_text", input.resume_text, input.max_input_chars)?;
    validate_input("jd_text", input.jd_text, input.max_input_chars)?;

    let start = Instant::now();
    let report: MatchAnalysis = call_typed(
        gateway,
        &build_match_analysis_prompt(input.resume_text, input.jd_text),
        JSON_ONLY_SYSTEM,
    )
    .await
    .map_err(|source| stage_failed(PipelineStage::MatchAnalysis, source))?;
    info!(
        stage = %PipelineStage::MatchAnalysis,
        elapsed_ms = start.elapsed().as_millis() as u64,
        total = report.match_score.total,
        will_auto_reject = report.ats_verdict.will_auto_reject,
        "Stage complete"
    );
    Ok(report)
}

/// Edits the source resume toward the job description in a single request,
/// keeping its structure. No analysis, so no pattern-based content generation.
pub async fn build_standard_resume(
    gateway: &dyn LlmGateway,
    input: PipelineInput<'_>,
) -> Result<StructuredResume, PipelineError> {
    validate_input("resume_text", input.resume_text, input.max_input_chars)?;
    validate_input("jd_text", input.jd_text, input.max_input_chars)?;

    let start = Instant::now();
    let resume: StructuredResume = call_typed(
        gateway,
        &build_standard_resume_prompt(input.resume_text, input.jd_text),
        JSON_ONLY_SYSTEM,
    )
    .await
    .map_err(|source| stage_failed(PipelineStage::StandardBuild, source))?;
    info!(
        stage = %PipelineStage::StandardBuild,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Stage complete"
    );
    Ok(resume)
}

fn validate_input(field: &str, text: &str, max_chars: usize) -> Result<(), PipelineError> {
    if text.trim().is_empty() {
        return Err(PipelineError::Input(format!("{field} cannot be empty")));
    }
    let chars = text.chars().count();
    if chars > max_chars {
        return Err(PipelineError::Input(format!(
            "{field} is too long ({chars} characters, maximum {max_chars})"
        )));
    }
    Ok(())
}

fn stage_failed(stage: PipelineStage, source: LlmError) -> PipelineError {
    warn!(%stage, error = %source, "Pipeline stage failed");
    PipelineError::Failed { stage, source }
}

/// Drops any work history the model produced when the source resume had none.
fn enforce_no_fabricated_work_history(
    resume: &mut StructuredResume,
    source_has_work_history: bool,
    run_id: Uuid,
    stage: PipelineStage,
) {
    if !source_has_work_history && resume.has_work_experience() {
        warn!(
            %run_id,
            %stage,
            roles = resume.work_experience.len(),
            "Model produced work experience absent from the source resume; removing it"
        );
        resume.work_experience.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::layout::metrics::default_page_metrics;

    /// Replays canned responses in order and records every prompt it receives.
    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<Value, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<Value, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete_json(&self, prompt: &str, _system: &str) -> Result<Value, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn analysis(pattern: &str, sections_present: &[&str]) -> Value {
        json!({
            "patternAnalysis": {
                "pattern": pattern,
                "confidence": "high",
                "sectionsPresent": sections_present,
                "sectionsMissing": [],
                "contentDensity": "just_right",
                "estimatedPageCount": 1
            },
            "contentStrategy": {
                "sectionsToOptimize": ["Work Experience"],
                "sectionsToGenerate": [],
                "contentExpansionNeeded": false,
                "contentCondensationNeeded": false,
                "prioritySections": ["Work Experience"]
            },
            "dynamicActions": []
        })
    }

    fn resume_with_work(name: &str) -> Value {
        json!({
            "header": {"name": name, "title": "Engineer", "contact": "jo@example.com"},
            "professionalSummary": "Ships reliable systems.",
            "coreSkills": {"technical": ["Rust"], "soft": []},
            "workExperience": [{
                "title": "Engineer",
                "company": "Acme",
                "duration": "2020 - 2024",
                "achievements": ["Cut latency by 40%"]
            }],
            "education": [{"degree": "BSc", "institution": "Uni", "year": "2019"}]
        })
    }

    fn input<'a>(resume_text: &'a str, jd_text: &'a str) -> PipelineInput<'a> {
        PipelineInput {
            resume_text,
            jd_text,
            max_input_chars: 1_000,
        }
    }

    #[tokio::test]
    async fn test_three_stages_in_order() {
        let gateway = ScriptedGateway::new(vec![
            Ok(analysis("Pattern A", &["Work Experience", "Education"])),
            Ok(resume_with_work("Draft Name")),
            Ok(resume_with_work("Final Name")),
        ]);

        let resume = build_optimized_resume(&gateway, &default_page_metrics(), input("RESUME-TEXT", "JD-TEXT"))
            .await
            .unwrap();
        assert_eq!(resume.header.name, "Final Name");
        assert_eq!(resume.work_experience.len(), 1);

        let prompts = gateway.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("RESUME-TEXT") && prompts[0].contains("JD-TEXT"));
        assert!(prompts[1].contains(r#""pattern":"Pattern A""#), "analysis is threaded into generation");
        assert!(prompts[2].contains("Draft Name"), "draft is threaded into layout");
        assert!(prompts[2].contains("## MEASURED LAYOUT"));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_calls() {
        let gateway = ScriptedGateway::new(vec![]);
        let err = build_optimized_resume(&gateway, &default_page_metrics(), input("   ", "JD"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));
        assert!(gateway.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_input_is_rejected() {
        let gateway = ScriptedGateway::new(vec![]);
        let long = "x".repeat(1_001);
        let err = build_optimized_resume(&gateway, &default_page_metrics(), input("resume", &long))
            .await
            .unwrap_err();
        match err {
            PipelineError::Input(msg) => assert!(msg.starts_with("jd_text is too long")),
            other => panic!("expected input error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gateway_failure_aborts_with_generic_error() {
        let gateway = ScriptedGateway::new(vec![
            Ok(analysis("Pattern A", &["Work Experience"])),
            Err(LlmError::Api {
                status: 500,
                message: "overloaded".to_string(),
            }),
        ]);

        let err = build_optimized_resume(&gateway, &default_page_metrics(), input("resume", "jd"))
            .await
            .unwrap_err();
        match &err {
            PipelineError::Failed { stage, .. } => assert_eq!(*stage, PipelineStage::Generation),
            other => panic!("expected stage failure, got {other:?}"),
        }
        assert_eq!(gateway.prompts().len(), 2, "layout stage is never attempted");
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_stage_failure() {
        let gateway = ScriptedGateway::new(vec![Ok(json!({"unexpected": true}))]);
        let err = build_optimized_resume(&gateway, &default_page_metrics(), input("resume", "jd"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Failed {
                stage: PipelineStage::Analysis,
                source: LlmError::Schema { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_no_work_history_in_source_means_none_in_output() {
        let gateway = ScriptedGateway::new(vec![
            Ok(analysis("Pattern C", &["Education", "Projects", "Skills"])),
            Ok(resume_with_work("Draft")),
            Ok(resume_with_work("Final")),
        ]);

        let resume = build_optimized_resume(
            &gateway,
            &default_page_metrics(),
            input("Student. Education: BSc 2024. Projects: chess engine.", "Junior developer"),
        )
        .await
        .unwrap();
        assert!(resume.work_experience.is_empty());

        let prompts = gateway.prompts();
        assert!(!prompts[2].contains("Acme"), "fabricated role is not passed to layout");
        assert!(prompts[1].contains("do NOT create or fabricate"));
    }

    #[tokio::test]
    async fn test_real_work_history_under_other_labels_is_kept() {
        let gateway = ScriptedGateway::new(vec![
            Ok(analysis("Pattern A", &["Relevant Experience", "Education", "Skills"])),
            Ok(resume_with_work("Draft")),
            Ok(resume_with_work("Final")),
        ]);

        let resume = build_optimized_resume(
            &gateway,
            &default_page_metrics(),
            input("Relevant Experience: Engineer, Acme 2020-2024", "Senior engineer"),
        )
        .await
        .unwrap();
        assert_eq!(resume.work_experience.len(), 1);
        assert_eq!(resume.work_experience[0].company, "Acme");
        assert!(gateway.prompts()[2].contains("Acme"), "draft roles reach the layout stage");
    }

    #[tokio::test]
    async fn test_experienced_pattern_keeps_work_history_without_section_labels() {
        let gateway = ScriptedGateway::new(vec![
            Ok(analysis("Pattern B", &[])),
            Ok(resume_with_work("Draft")),
            Ok(resume_with_work("Final")),
        ]);

        let resume = build_optimized_resume(&gateway, &default_page_metrics(), input("resume", "jd"))
            .await
            .unwrap();
        assert_eq!(resume.work_experience.len(), 1);
    }

    fn match_report(total: u32) -> Value {
        json!({
            "matchScore": {
                "total": total,
                "hardSkills": 20,
                "softSkills": 20,
                "roleAlignment": 20,
                "atsCompatibility": 20
            },
            "missingKeywords": ["Terraform"],
            "atsVerdict": {"willAutoReject": false, "reason": "Keywords present"}
        })
    }

    #[tokio::test]
    async fn test_match_analysis_is_one_call() {
        let gateway = ScriptedGateway::new(vec![Ok(match_report(80))]);
        let report = analyze_match(&gateway, input("RESUME-TEXT", "JD-TEXT"))
            .await
            .unwrap();
        assert_eq!(report.match_score.total, 80.0);
        assert_eq!(report.missing_keywords, vec!["Terraform"]);

        let prompts = gateway.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("RESUME-TEXT") && prompts[0].contains("JD-TEXT"));
    }

    #[tokio::test]
    async fn test_match_analysis_out_of_range_score_fails_with_its_own_message() {
        let gateway = ScriptedGateway::new(vec![Ok(match_report(180))]);
        let err = analyze_match(&gateway, input("resume", "jd")).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Failed {
                stage: PipelineStage::MatchAnalysis,
                source: LlmError::Schema { .. }
            }
        ));
        assert_eq!(err.user_message(), MATCH_ANALYSIS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_match_analysis_rejects_blank_input_without_calls() {
        let gateway = ScriptedGateway::new(vec![]);
        let err = analyze_match(&gateway, input("resume", " \n")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));
        assert!(gateway.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_standard_build_is_one_call() {
        let gateway = ScriptedGateway::new(vec![Ok(resume_with_work("Edited"))]);
        let resume = build_standard_resume(&gateway, input("RESUME-TEXT", "JD-TEXT"))
            .await
            .unwrap();
        assert_eq!(resume.header.name, "Edited");

        let prompts = gateway.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Enhance, Don't Replace"));
    }

    #[tokio::test]
    async fn test_standard_build_failure_uses_pipeline_message() {
        let gateway = ScriptedGateway::new(vec![Err(LlmError::EmptyContent)]);
        let err = build_standard_resume(&gateway, input("resume", "jd")).await.unwrap_err();
        assert_eq!(err.user_message(), PIPELINE_FAILED_MESSAGE);
    }
}
