//! Data model for the transcript analysis pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::schema::Domain;
use crate::llm_client::GatewayError;

/// One transcript plus optional context, immutable for the lifetime of a
/// single pipeline invocation.
#[derive(Debug, Clone)]
pub struct TranscriptInput {
    pub text: String,
    pub language: Option<String>,
    pub job_role: Option<String>,
    pub interview_type: Option<InterviewType>,
    pub candidate_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Behavioral,
    Technical,
    Mixed,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Behavioral => "behavioral",
            InterviewType::Technical => "technical",
            InterviewType::Mixed => "mixed",
        }
    }
}

/// Coarse transcript suitability estimate. Informational above the hard
/// word-count floor — a poor transcript is analyzed, just flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Poor => "poor",
            QualityTier::Fair => "fair",
            QualityTier::Good => "good",
            QualityTier::Excellent => "excellent",
        }
    }
}

/// Heuristic quality metrics derived purely from the transcript text.
#[derive(Debug, Clone, Serialize)]
pub struct QualityMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub speaker_turns: usize,
    pub has_questions: bool,
    pub has_responses: bool,
    pub estimated_quality: QualityTier,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// The model's validated self-reported assessment. Instances exist only
/// past the validator — construction elsewhere is a bug.
#[derive(Debug, Clone)]
pub struct RawModelOutput {
    /// Facet scores per domain, keyed by facet index 1..=6. The validator
    /// guarantees all 5 domains and all 6 facets are present and in range.
    pub scores: BTreeMap<Domain, BTreeMap<u32, f64>>,
    pub evidence: Vec<RawEvidence>,
    pub confidence: f64,
    pub reasoning: String,
}

/// One evidence citation as reported by the model. Items are lenient:
/// only the evidence *list* is schema-checked, so every field defaults
/// rather than failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvidence {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub facet: i64,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Categorical classification of a facet or domain score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultBand {
    Low,
    Neutral,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetScore {
    pub score: f64,
    /// Always 1 for a single facet.
    pub count: u32,
    pub result: ResultBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScore {
    /// Sum of the 6 facet scores, in [6, 30] for valid input.
    pub score: f64,
    /// Always 6.
    pub count: u32,
    pub result: ResultBand,
    pub facet: BTreeMap<String, FacetScore>,
}

pub type Scores = BTreeMap<Domain, DomainScore>;

/// An evidence citation enriched with the human-readable facet name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub domain: String,
    pub facet: i64,
    pub facet_name: String,
    pub quote: String,
    pub reasoning: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub model: String,
    pub timestamp: DateTime<Utc>,
    pub transcript_length: usize,
    pub tokens_used: u32,
    /// Duration of the gateway call only, in milliseconds.
    pub processing_time_ms: u64,
    pub content_quality: QualityTier,
    /// Weighted 0-100 quality blend. Metadata only, never gates analysis.
    pub content_quality_score: u8,
    pub deterministic_seed: u64,
    pub system_fingerprint: Option<String>,
}

/// The pipeline's final output. Assembled only after every prior stage
/// succeeds — no partially populated instance is ever returned.
#[derive(Debug, Clone, Serialize)]
pub struct OceanAnalysis {
    pub scores: Scores,
    pub evidence: Vec<Evidence>,
    pub confidence: f64,
    pub reasoning: String,
    pub metadata: AnalysisMetadata,
}

/// A single schema violation found in the model's raw output.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// All violations found in one response, collected rather than
/// fail-fast so oracle drift is diagnosable in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct Violations(pub Vec<Violation>);

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Failure taxonomy for one pipeline invocation. Every variant is
/// terminal for the current request — nothing is retried internally.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    QualityTooLow(String),

    #[error("model invocation failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("model response is not valid JSON: {0}")]
    OutputParse(#[source] serde_json::Error),

    #[error("model output failed validation: {0}")]
    OutputValidation(Violations),
}
