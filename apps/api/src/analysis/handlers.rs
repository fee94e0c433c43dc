//! HTTP handlers for the analysis API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::analyzer::analyze_transcript;
use crate::analysis::models::{
    InterviewType, QualityTier, ResultBand, TranscriptInput,
};
use crate::analysis::quality::assess_content_quality;
use crate::analysis::repository::{
    fetch_analysis, save_analysis, AnalysisView, FetchOptions, SaveAnalysisParams,
};
use crate::analysis::schema::Domain;
use crate::errors::{AppError, FieldError};
use crate::state::AppState;

/// Minimum request length in characters. Deliberately distinct from the
/// quality gate's 100-word floor — the two checks use different units
/// and stay independent.
const MIN_TRANSCRIPT_CHARS: usize = 100;

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub transcript: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub job_role: Option<String>,
    pub interview_type: Option<InterviewType>,
    pub candidate_name: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct QualitySummary {
    pub score: QualityTier,
    pub word_count: usize,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMetadata {
    pub tokens_used: u32,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub confidence: f64,
    pub content_quality: QualitySummary,
    pub scores: BTreeMap<Domain, ResultBand>,
    pub metadata: ResponseMetadata,
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if req.transcript.chars().count() < MIN_TRANSCRIPT_CHARS {
        return Err(AppError::FieldValidation(vec![FieldError {
            field: "transcript",
            message: "Transcript must be at least 100 characters".to_string(),
        }]));
    }

    let quality = assess_content_quality(&req.transcript);
    if !quality.warnings.is_empty() {
        warn!("Quality warnings: {:?}", quality.warnings);
    }

    let input = TranscriptInput {
        text: req.transcript.clone(),
        language: Some(req.language.clone()),
        job_role: req.job_role.clone(),
        interview_type: req.interview_type,
        candidate_name: req.candidate_name.clone(),
    };

    let analysis = analyze_transcript(state.gateway.as_ref(), &input).await?;

    let id = save_analysis(
        &state.db,
        SaveAnalysisParams {
            transcript: &req.transcript,
            language: &req.language,
            job_role: req.job_role.as_deref(),
            interview_type: req.interview_type,
            candidate_name: req.candidate_name.as_deref(),
            analysis: &analysis,
            request_metadata: req.metadata.as_ref(),
        },
    )
    .await?;

    let scores = analysis
        .scores
        .iter()
        .map(|(&domain, domain_score)| (domain, domain_score.result))
        .collect();

    Ok(Json(AnalyzeResponse {
        id,
        confidence: analysis.confidence,
        content_quality: QualitySummary {
            score: quality.estimated_quality,
            word_count: quality.word_count,
            warnings: quality.warnings,
            recommendations: quality.recommendations,
        },
        scores,
        metadata: ResponseMetadata {
            tokens_used: analysis.metadata.tokens_used,
            processing_time_ms: analysis.metadata.processing_time_ms,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub quality: QualityTier,
    pub word_count: usize,
    pub sentence_count: usize,
    pub speaker_turns: usize,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub is_ready: bool,
}

/// POST /api/analyze/validate
///
/// Quality check without running the analysis — no model call, no
/// persistence.
pub async fn handle_validate(
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    let quality = assess_content_quality(&req.transcript);

    Ok(Json(ValidateResponse {
        quality: quality.estimated_quality,
        word_count: quality.word_count,
        sentence_count: quality.sentence_count,
        speaker_turns: quality.speaker_turns,
        warnings: quality.warnings,
        recommendations: quality.recommendations,
        is_ready: quality.estimated_quality != QualityTier::Poor,
    }))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultQuery {
    pub include_evidence: bool,
    pub include_transcript: bool,
}

/// GET /api/results/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ResultQuery>,
) -> Result<Json<AnalysisView>, AppError> {
    let view = fetch_analysis(
        &state.db,
        id,
        FetchOptions {
            include_evidence: params.include_evidence,
            include_transcript: params.include_transcript,
        },
    )
    .await?;

    view.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}
