//! Transforms validated model output into domain/facet scores and
//! enriches evidence citations with canonical facet names. Both
//! operations are pure and total for validated input.

use crate::analysis::models::{
    DomainScore, Evidence, FacetScore, RawEvidence, RawModelOutput, ResultBand, Scores,
};
use crate::analysis::schema::{self, Domain};

/// Classifies an aggregate: average above 3.5 is high, below 2.5 is low,
/// anything between is neutral. Boundaries are strict, and the function
/// handles non-integer aggregates identically to integer ones.
pub fn classify(score: f64, count: u32) -> ResultBand {
    let avg = score / count as f64;
    if avg > 3.5 {
        ResultBand::High
    } else if avg < 2.5 {
        ResultBand::Low
    } else {
        ResultBand::Neutral
    }
}

/// Aggregates validated per-facet values into facet and domain scores.
/// Each domain score is the sum of its 6 facets and classifies against
/// count 6; each facet classifies against count 1.
pub fn transform_scores(output: &RawModelOutput) -> Scores {
    output
        .scores
        .iter()
        .map(|(&domain, facets)| {
            let domain_score: f64 = facets.values().sum();
            let facet = facets
                .iter()
                .map(|(index, &score)| {
                    (
                        index.to_string(),
                        FacetScore {
                            score,
                            count: 1,
                            result: classify(score, 1),
                        },
                    )
                })
                .collect();

            (
                domain,
                DomainScore {
                    score: domain_score,
                    count: 6,
                    result: classify(domain_score, 6),
                    facet,
                },
            )
        })
        .collect()
}

/// Attaches the canonical facet name to each raw citation. Unknown
/// (domain, facet) pairs get a synthetic `Facet {index}` label — a
/// naming miss never rejects the analysis, since evidence is
/// supplementary rather than score-bearing.
pub fn enrich_evidence(raw_evidence: &[RawEvidence]) -> Vec<Evidence> {
    raw_evidence
        .iter()
        .map(|ev| {
            let facet_name = Domain::parse(&ev.domain)
                .and_then(|domain| schema::facet_name(domain, ev.facet))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Facet {}", ev.facet));

            Evidence {
                domain: ev.domain.clone(),
                facet: ev.facet,
                facet_name,
                quote: ev.quote.clone(),
                reasoning: ev.reasoning.clone(),
                confidence: ev.confidence,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::fixtures;
    use crate::analysis::validator::validate_output;

    fn validated(value: serde_json::Value) -> RawModelOutput {
        validate_output(&value.to_string()).unwrap()
    }

    #[test]
    fn test_classify_integer_facets() {
        assert_eq!(classify(1.0, 1), ResultBand::Low);
        assert_eq!(classify(2.0, 1), ResultBand::Low);
        assert_eq!(classify(3.0, 1), ResultBand::Neutral);
        assert_eq!(classify(4.0, 1), ResultBand::High);
        assert_eq!(classify(5.0, 1), ResultBand::High);
    }

    #[test]
    fn test_classify_boundaries_are_strict() {
        // Exactly 3.5 and 2.5 are neutral, not high/low.
        assert_eq!(classify(3.5, 1), ResultBand::Neutral);
        assert_eq!(classify(2.5, 1), ResultBand::Neutral);
        assert_eq!(classify(21.0, 6), ResultBand::Neutral);
        assert_eq!(classify(15.0, 6), ResultBand::Neutral);
    }

    #[test]
    fn test_domain_score_is_sum_of_facets() {
        let output = validated(fixtures::raw_output_with(|_, idx| idx as f64 % 5.0 + 1.0));
        let scores = transform_scores(&output);
        for (domain, domain_score) in &scores {
            let facet_sum: f64 = domain_score.facet.values().map(|f| f.score).sum();
            assert_eq!(domain_score.score, facet_sum, "sum mismatch for {domain}");
            assert!(domain_score.score >= 6.0 && domain_score.score <= 30.0);
            assert_eq!(domain_score.count, 6);
            assert_eq!(domain_score.facet.len(), 6);
        }
    }

    #[test]
    fn test_o_domain_example_classifies_high() {
        // O facets {1:4, 2:3, 3:4, 4:3, 5:5, 6:3} -> 22, 22/6 > 3.5
        let facets = [4.0, 3.0, 4.0, 3.0, 5.0, 3.0];
        let output = validated(fixtures::raw_output_with(|domain, idx| {
            if domain == Domain::O {
                facets[(idx - 1) as usize]
            } else {
                3.0
            }
        }));
        let scores = transform_scores(&output);
        let o = &scores[&Domain::O];
        assert_eq!(o.score, 22.0);
        assert_eq!(o.result, ResultBand::High);
    }

    #[test]
    fn test_n_domain_example_classifies_low() {
        // N facets {1:2, 2:2, 3:2, 4:3, 5:3, 6:2} -> 14, 14/6 < 2.5
        let facets = [2.0, 2.0, 2.0, 3.0, 3.0, 2.0];
        let output = validated(fixtures::raw_output_with(|domain, idx| {
            if domain == Domain::N {
                facets[(idx - 1) as usize]
            } else {
                3.0
            }
        }));
        let scores = transform_scores(&output);
        let n = &scores[&Domain::N];
        assert_eq!(n.score, 14.0);
        assert_eq!(n.result, ResultBand::Low);
    }

    #[test]
    fn test_all_neutral_domain_is_neutral() {
        let output = validated(fixtures::raw_output());
        let scores = transform_scores(&output);
        for domain_score in scores.values() {
            assert_eq!(domain_score.score, 18.0);
            assert_eq!(domain_score.result, ResultBand::Neutral);
            for facet in domain_score.facet.values() {
                assert_eq!(facet.count, 1);
                assert_eq!(facet.result, ResultBand::Neutral);
            }
        }
    }

    #[test]
    fn test_facet_classification_per_value() {
        let output = validated(fixtures::raw_output_with(|_, idx| idx.min(5) as f64));
        let scores = transform_scores(&output);
        let facet = &scores[&Domain::C].facet;
        assert_eq!(facet["1"].result, ResultBand::Low);
        assert_eq!(facet["2"].result, ResultBand::Low);
        assert_eq!(facet["3"].result, ResultBand::Neutral);
        assert_eq!(facet["4"].result, ResultBand::High);
        assert_eq!(facet["5"].result, ResultBand::High);
    }

    #[test]
    fn test_enrich_looks_up_canonical_names() {
        let raw = vec![
            RawEvidence {
                domain: "O".to_string(),
                facet: 5,
                quote: "quote".to_string(),
                reasoning: "reasoning".to_string(),
                confidence: 0.9,
            },
            RawEvidence {
                domain: "N".to_string(),
                facet: 1,
                quote: String::new(),
                reasoning: String::new(),
                confidence: 0.4,
            },
        ];
        let enriched = enrich_evidence(&raw);
        assert_eq!(enriched[0].facet_name, "Intellect");
        assert_eq!(enriched[1].facet_name, "Anxiety");
        assert_eq!(enriched[0].quote, "quote");
        assert_eq!(enriched[1].confidence, 0.4);
    }

    #[test]
    fn test_enrich_falls_back_on_unknown_facet_index() {
        let raw = vec![RawEvidence {
            domain: "E".to_string(),
            facet: 9,
            ..Default::default()
        }];
        let enriched = enrich_evidence(&raw);
        assert_eq!(enriched[0].facet_name, "Facet 9");
    }

    #[test]
    fn test_enrich_falls_back_on_unknown_domain() {
        let raw = vec![RawEvidence {
            domain: "X".to_string(),
            facet: 2,
            ..Default::default()
        }];
        let enriched = enrich_evidence(&raw);
        assert_eq!(enriched[0].facet_name, "Facet 2");
    }

    #[test]
    fn test_enrich_never_drops_items() {
        let raw = vec![RawEvidence::default(); 12];
        assert_eq!(enrich_evidence(&raw).len(), 12);
    }
}
