//! Persistence for completed analyses.
//!
//! The pool is constructed once at startup and injected through
//! `AppState`; nothing here reaches for ambient global state. Stored
//! records flatten the per-facet scores into an answers list, and the
//! fetch projection rebuilds per-domain aggregates from those answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::models::{InterviewType, OceanAnalysis, ResultBand, Scores};
use crate::analysis::schema::Domain;
use crate::analysis::transformer::classify;
use crate::errors::AppError;

/// One flattened facet answer: (domain, facet index, score).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRow {
    pub domain: Domain,
    pub facet: u32,
    pub score: f64,
}

/// Flattens domain/facet scores into the stored answers list, in
/// canonical domain order with facets ascending.
pub fn flatten_answers(scores: &Scores) -> Vec<AnswerRow> {
    let mut answers = Vec::with_capacity(30);
    for domain in Domain::ALL {
        if let Some(domain_score) = scores.get(&domain) {
            let mut indices: Vec<u32> = domain_score
                .facet
                .keys()
                .filter_map(|k| k.parse().ok())
                .collect();
            indices.sort_unstable();
            for index in indices {
                if let Some(facet) = domain_score.facet.get(&index.to_string()) {
                    answers.push(AnswerRow {
                        domain,
                        facet: index,
                        score: facet.score,
                    });
                }
            }
        }
    }
    answers
}

pub struct SaveAnalysisParams<'a> {
    pub transcript: &'a str,
    pub language: &'a str,
    pub job_role: Option<&'a str>,
    pub interview_type: Option<InterviewType>,
    pub candidate_name: Option<&'a str>,
    pub analysis: &'a OceanAnalysis,
    pub request_metadata: Option<&'a Value>,
}

/// Persists a completed analysis and returns its id.
pub async fn save_analysis(
    pool: &PgPool,
    params: SaveAnalysisParams<'_>,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    let answers = serde_json::to_value(flatten_answers(&params.analysis.scores))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize answers: {e}")))?;
    let evidence = serde_json::to_value(&params.analysis.evidence)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize evidence: {e}")))?;
    let analysis_metadata = serde_json::to_value(&params.analysis.metadata).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize analysis metadata: {e}"))
    })?;

    sqlx::query(
        r#"
        INSERT INTO analysis_results
            (id, language, transcript, job_role, interview_type, candidate_name,
             transcript_length, answers, evidence, confidence, reasoning,
             analysis_metadata, request_metadata)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(id)
    .bind(params.language)
    .bind(params.transcript)
    .bind(params.job_role)
    .bind(params.interview_type.map(|t| t.as_str()))
    .bind(params.candidate_name)
    .bind(params.transcript.chars().count() as i32)
    .bind(&answers)
    .bind(&evidence)
    .bind(params.analysis.confidence)
    .bind(&params.analysis.reasoning)
    .bind(&analysis_metadata)
    .bind(params.request_metadata.cloned().unwrap_or_else(|| Value::Object(Default::default())))
    .execute(pool)
    .await?;

    Ok(id)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    pub include_evidence: bool,
    pub include_transcript: bool,
}

/// Per-domain aggregate rebuilt from the stored answers.
#[derive(Debug, Clone, Serialize)]
pub struct DomainSummary {
    pub score: f64,
    pub average: f64,
    pub result: ResultBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptInfo {
    pub length: i32,
    pub job_role: Option<String>,
    pub interview_type: Option<String>,
    pub candidate_name: Option<String>,
}

/// Projected stored view returned by `fetch_analysis`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub language: String,
    pub scores: std::collections::BTreeMap<Domain, DomainSummary>,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    pub analysis_metadata: Value,
    pub transcript_info: TranscriptInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

#[derive(sqlx::FromRow)]
struct AnalysisRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    language: String,
    transcript: String,
    job_role: Option<String>,
    interview_type: Option<String>,
    candidate_name: Option<String>,
    transcript_length: i32,
    answers: Value,
    evidence: Value,
    confidence: f64,
    reasoning: String,
    analysis_metadata: Value,
}

pub async fn fetch_analysis(
    pool: &PgPool,
    id: Uuid,
    options: FetchOptions,
) -> Result<Option<AnalysisView>, AppError> {
    let row: Option<AnalysisRow> = sqlx::query_as(
        r#"
        SELECT id, created_at, language, transcript, job_role, interview_type,
               candidate_name, transcript_length, answers, evidence, confidence,
               reasoning, analysis_metadata
        FROM analysis_results
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let answers: Vec<AnswerRow> = serde_json::from_value(row.answers)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored answers are malformed: {e}")))?;

    Ok(Some(AnalysisView {
        id: row.id,
        timestamp: row.created_at,
        language: row.language,
        scores: summarize_answers(&answers),
        confidence: row.confidence,
        reasoning: row.reasoning,
        evidence: options.include_evidence.then_some(row.evidence),
        analysis_metadata: row.analysis_metadata,
        transcript_info: TranscriptInfo {
            length: row.transcript_length,
            job_role: row.job_role,
            interview_type: row.interview_type,
            candidate_name: row.candidate_name,
        },
        transcript: options.include_transcript.then_some(row.transcript),
    }))
}

/// Rebuilds per-domain sum/average/band from the flattened answers.
fn summarize_answers(answers: &[AnswerRow]) -> std::collections::BTreeMap<Domain, DomainSummary> {
    let mut scores = std::collections::BTreeMap::new();
    for domain in Domain::ALL {
        let domain_answers: Vec<&AnswerRow> =
            answers.iter().filter(|a| a.domain == domain).collect();
        if domain_answers.is_empty() {
            continue;
        }
        let score: f64 = domain_answers.iter().map(|a| a.score).sum();
        let count = domain_answers.len() as u32;
        scores.insert(
            domain,
            DomainSummary {
                score,
                average: score / count as f64,
                result: classify(score, count),
            },
        );
    }
    scores
}
