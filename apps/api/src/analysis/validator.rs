//! Strict validation of the model's raw response against the declared
//! schema. This is the trust boundary: nothing downstream assumes
//! well-formed model output.
//!
//! Violations are collected across the whole response rather than
//! failing on the first, so one pass diagnoses all oracle drift. A
//! single malformed field still invalidates the entire response — there
//! is no partial recovery.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::analysis::models::{AnalysisError, RawEvidence, RawModelOutput, Violation, Violations};
use crate::analysis::schema::{Domain, CONFIDENCE_RANGE, FACET_INDICES, FACET_SCORE_RANGE};

/// Parses and validates raw model text. Fails with `OutputParse` when the
/// text is not JSON, or `OutputValidation` carrying every schema
/// violation found.
pub fn validate_output(raw_text: &str) -> Result<RawModelOutput, AnalysisError> {
    let value: Value =
        serde_json::from_str(strip_json_fences(raw_text)).map_err(AnalysisError::OutputParse)?;

    let mut violations = Vec::new();
    let scores = extract_scores(&value, &mut violations);
    let confidence = extract_confidence(&value, &mut violations);
    let evidence = extract_evidence(&value, &mut violations);

    if !violations.is_empty() {
        return Err(AnalysisError::OutputValidation(Violations(violations)));
    }

    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(RawModelOutput {
        scores,
        evidence,
        confidence,
        reasoning,
    })
}

fn extract_scores(
    value: &Value,
    violations: &mut Vec<Violation>,
) -> BTreeMap<Domain, BTreeMap<u32, f64>> {
    let mut result = BTreeMap::new();

    let Some(scores) = value.get("scores").and_then(Value::as_object) else {
        violations.push(Violation {
            field: "scores".to_string(),
            message: "missing scores object".to_string(),
        });
        return result;
    };

    for domain in Domain::ALL {
        let facets = scores
            .get(domain.as_str())
            .and_then(|d| d.get("facets"))
            .and_then(Value::as_object);

        let Some(facets) = facets else {
            violations.push(Violation {
                field: format!("scores.{domain}.facets"),
                message: format!("missing facets for domain {domain}"),
            });
            continue;
        };

        let mut domain_scores = BTreeMap::new();
        for index in FACET_INDICES {
            let raw = facets.get(&index.to_string());
            match raw.and_then(Value::as_f64) {
                Some(score) if FACET_SCORE_RANGE.contains(&score) => {
                    domain_scores.insert(index, score);
                }
                _ => {
                    violations.push(Violation {
                        field: format!("scores.{domain}.facets.{index}"),
                        message: format!(
                            "invalid score for {domain}-{index}: {}",
                            raw.map(Value::to_string).unwrap_or_else(|| "missing".to_string())
                        ),
                    });
                }
            }
        }
        result.insert(domain, domain_scores);
    }

    result
}

fn extract_confidence(value: &Value, violations: &mut Vec<Violation>) -> f64 {
    match value.get("confidence").and_then(Value::as_f64) {
        Some(confidence) if CONFIDENCE_RANGE.contains(&confidence) => confidence,
        _ => {
            violations.push(Violation {
                field: "confidence".to_string(),
                message: "confidence must be a number between 0 and 1".to_string(),
            });
            0.0
        }
    }
}

fn extract_evidence(value: &Value, violations: &mut Vec<Violation>) -> Vec<RawEvidence> {
    let Some(items) = value.get("evidence").and_then(Value::as_array) else {
        violations.push(Violation {
            field: "evidence".to_string(),
            message: "evidence must be an array".to_string(),
        });
        return Vec::new();
    };

    // Evidence is supplementary, not score-bearing: items that fail typed
    // deserialization degrade to defaults instead of invalidating the
    // response.
    items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
