//! Analysis orchestration — sequences quality gating, prompt/seed
//! composition, the single gateway call, validation, transformation,
//! and final assembly.
//!
//! Each invocation is a self-contained, stateless computation: nothing
//! is cached or shared across invocations, and the only suspension
//! point is the gateway call. The first failure in the sequence is
//! terminal — no partial `OceanAnalysis` is ever returned.

use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::analysis::models::{AnalysisError, AnalysisMetadata, OceanAnalysis, TranscriptInput};
use crate::analysis::prompts::{build_user_prompt, derive_seed, OCEAN_SYSTEM_PROMPT};
use crate::analysis::quality::{assess_content_quality, quality_score, should_proceed};
use crate::analysis::transformer::{enrich_evidence, transform_scores};
use crate::analysis::validator::validate_output;
use crate::llm_client::{ModelGateway, MODEL};

pub async fn analyze_transcript(
    gateway: &dyn ModelGateway,
    input: &TranscriptInput,
) -> Result<OceanAnalysis, AnalysisError> {
    let quality = assess_content_quality(&input.text);
    let gate = should_proceed(&quality);
    if !gate.proceed {
        return Err(AnalysisError::QualityTooLow(gate.reason.unwrap_or_else(
            || "Transcript quality is insufficient for analysis".to_string(),
        )));
    }

    let seed = derive_seed(&input.text);
    let user_prompt = build_user_prompt(
        &input.text,
        input.job_role.as_deref(),
        input.interview_type,
    );

    let started = Instant::now();
    let response = gateway
        .invoke(OCEAN_SYSTEM_PROMPT, &user_prompt, seed)
        .await?;
    // Processing time covers the gateway call only, not the local stages.
    let processing_time_ms = started.elapsed().as_millis() as u64;

    let output = validate_output(&response.raw_text)?;
    let scores = transform_scores(&output);
    let evidence = enrich_evidence(&output.evidence);

    info!(
        "transcript analyzed: seed={}, tokens={}, quality={}, evidence_items={}",
        seed,
        response.tokens_used,
        quality.estimated_quality.as_str(),
        evidence.len()
    );

    Ok(OceanAnalysis {
        scores,
        evidence,
        confidence: output.confidence,
        reasoning: output.reasoning,
        metadata: AnalysisMetadata {
            model: MODEL.to_string(),
            timestamp: Utc::now(),
            transcript_length: input.text.chars().count(),
            tokens_used: response.tokens_used,
            processing_time_ms,
            content_quality: quality.estimated_quality,
            content_quality_score: quality_score(&quality),
            deterministic_seed: seed,
            system_fingerprint: response.system_fingerprint,
        },
    })
}
