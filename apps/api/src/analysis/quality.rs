//! Content-quality heuristics computed from raw transcript text.
//!
//! Everything here is pure and total: the assessor never fails, and the
//! gate below it only blocks transcripts under the hard 100-word floor.
//! Above that floor quality is advisory — poor transcripts are analyzed
//! but flagged through warnings.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{QualityMetrics, QualityTier};

/// Hard floor for the analysis gate, in words. Independent of the
/// caller boundary's 100-character minimum, which uses a different unit.
pub const MIN_WORDS_FOR_ANALYSIS: usize = 100;

const REJECTION_REASON: &str =
    "Transcript too short. Minimum 100 words required for any meaningful analysis.";

/// Dialogue markers counted as speaker turns. A single line may match
/// several patterns; the sum is a coarse density signal, so double
/// counting is deliberate.
static SPEAKER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)interviewer:").unwrap(),
        Regex::new(r"(?i)candidate:").unwrap(),
        Regex::new(r"(?i)question:").unwrap(),
        Regex::new(r"(?i)answer:").unwrap(),
        Regex::new(r"(?m)^[A-Z][a-z]+:").unwrap(),
    ]
});

static INTERROGATIVE_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tell me|describe|what|how|why|when|where").unwrap());

/// First-person pronouns and behavioral vocabulary. Counted as the number
/// of distinct patterns that match at least once, not total occurrences.
static BEHAVIORAL_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bI\b").unwrap(),
        Regex::new(r"(?i)\bwe\b").unwrap(),
        Regex::new(r"(?i)\bteam\b").unwrap(),
        Regex::new(r"(?i)\bproject\b").unwrap(),
        Regex::new(r"(?i)\bchallenge\b").unwrap(),
        Regex::new(r"(?i)\bproblem\b").unwrap(),
        Regex::new(r"(?i)\bsolution\b").unwrap(),
    ]
});

pub fn assess_content_quality(transcript: &str) -> QualityMetrics {
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    // split_whitespace yields no tokens for empty or whitespace-only
    // input, so an empty transcript counts 0 words rather than 1.
    let word_count = transcript.split_whitespace().count();
    let sentence_count = transcript
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();

    let speaker_turns: usize = SPEAKER_PATTERNS
        .iter()
        .map(|p| p.find_iter(transcript).count())
        .sum();

    let has_questions = transcript.contains('?') || INTERROGATIVE_KEYWORDS.is_match(transcript);
    let has_responses = speaker_turns > 2 || sentence_count > 10;

    let estimated_quality = if word_count < 200 {
        warnings.push("Transcript is very short (under 200 words)".to_string());
        warnings.push("Many personality facets will have low confidence scores".to_string());
        recommendations.push("Provide at least 500 words for reliable assessment".to_string());
        recommendations
            .push("Include multiple behavioral questions and detailed answers".to_string());
        QualityTier::Poor
    } else if word_count < 500 {
        warnings.push("Transcript is relatively short (under 500 words)".to_string());
        warnings.push("Some personality facets may have insufficient evidence".to_string());
        recommendations
            .push("Longer transcripts (1000+ words) provide more accurate results".to_string());
        QualityTier::Fair
    } else if word_count < 1000 {
        if speaker_turns < 5 {
            warnings.push(
                "Few speaker turns detected - consider including more Q&A exchanges".to_string(),
            );
        }
        QualityTier::Good
    } else {
        QualityTier::Excellent
    };

    if !has_questions {
        warnings.push("No questions detected - is this a complete interview transcript?".to_string());
        recommendations.push("Include interviewer questions for better context".to_string());
    }

    if speaker_turns < 3 {
        warnings.push("Limited dialogue structure detected".to_string());
        recommendations
            .push("Include both interviewer questions and candidate responses".to_string());
    }

    let indicator_count = BEHAVIORAL_INDICATORS
        .iter()
        .filter(|p| p.is_match(transcript))
        .count();

    if indicator_count < 3 && word_count > 200 {
        warnings.push("Limited behavioral content detected".to_string());
        recommendations
            .push("Behavioral interview questions reveal more personality traits".to_string());
    }

    QualityMetrics {
        word_count,
        sentence_count,
        speaker_turns,
        has_questions,
        has_responses,
        estimated_quality,
        warnings,
        recommendations,
    }
}

/// Outcome of the analysis gate.
#[derive(Debug, Clone)]
pub struct GateDecision {
    pub proceed: bool,
    pub reason: Option<String>,
}

/// Blocks only transcripts under the hard word floor. Every other tier
/// proceeds and carries its warnings along instead.
pub fn should_proceed(quality: &QualityMetrics) -> GateDecision {
    if quality.word_count < MIN_WORDS_FOR_ANALYSIS {
        return GateDecision {
            proceed: false,
            reason: Some(REJECTION_REASON.to_string()),
        };
    }

    GateDecision {
        proceed: true,
        reason: None,
    }
}

/// Weighted 0-100 quality blend: 50% word count against a 1000-word
/// ceiling, 30% speaker turns against a 5-turn ceiling, 20% binary
/// content structure. Metadata only — never gates analysis.
pub fn quality_score(quality: &QualityMetrics) -> u8 {
    let word_score = ((quality.word_count as f64 / 1000.0) * 100.0).min(100.0);
    let structure_score = if quality.speaker_turns >= 5 {
        100.0
    } else {
        (quality.speaker_turns as f64 / 5.0) * 100.0
    };
    let content_score = if quality.has_questions && quality.has_responses {
        100.0
    } else {
        50.0
    };

    (word_score * 0.5 + structure_score * 0.3 + content_score * 0.2).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an interview-shaped transcript of roughly `words` filler
    /// words spread across `turns` alternating speaker lines.
    fn interview_transcript(words: usize, turns: usize) -> String {
        let candidate_lines = (turns / 2).max(1);
        let per_line = words / candidate_lines;
        let mut text = String::new();
        for i in 0..turns {
            if i % 2 == 0 {
                text.push_str("Interviewer: Tell me about a project you led?\n");
            } else {
                text.push_str("Candidate: ");
                for _ in 0..per_line {
                    text.push_str("work ");
                }
                text.push_str("and the team solved the problem.\n");
            }
        }
        text
    }

    #[test]
    fn test_empty_transcript_counts_zero_words() {
        let q = assess_content_quality("");
        assert_eq!(q.word_count, 0);
        assert_eq!(q.sentence_count, 0);
        assert_eq!(q.speaker_turns, 0);
    }

    #[test]
    fn test_whitespace_only_counts_zero_words() {
        let q = assess_content_quality("   \n\t  ");
        assert_eq!(q.word_count, 0);
    }

    #[test]
    fn test_word_and_sentence_counts() {
        let q = assess_content_quality("I led the team. We shipped it! Was it hard?");
        assert_eq!(q.word_count, 10);
        assert_eq!(q.sentence_count, 3);
    }

    #[test]
    fn test_trailing_punctuation_does_not_add_sentence() {
        let q = assess_content_quality("One sentence.");
        assert_eq!(q.sentence_count, 1);
    }

    #[test]
    fn test_speaker_turns_counts_all_markers() {
        let text = "Interviewer: hello\nCandidate: hi\nAlice: sure\nQuestion: why?\nAnswer: because";
        let q = assess_content_quality(text);
        // Question:/Answer: lines also match the generic Name: pattern,
        // so they count twice. Deliberate coarse density signal.
        assert_eq!(q.speaker_turns, 9);
    }

    #[test]
    fn test_speaker_markers_case_insensitive() {
        let q = assess_content_quality("INTERVIEWER: one\ncandidate: two");
        assert!(q.speaker_turns >= 2);
    }

    #[test]
    fn test_question_detection_via_keyword_without_mark() {
        let q = assess_content_quality("Describe your biggest weakness");
        assert!(q.has_questions);
    }

    #[test]
    fn test_no_questions_emits_warning_and_recommendation() {
        let q = assess_content_quality("Just a flat statement with no cues at all");
        assert!(!q.has_questions);
        assert!(q
            .warnings
            .iter()
            .any(|w| w.contains("No questions detected")));
        assert!(q
            .recommendations
            .iter()
            .any(|r| r.contains("interviewer questions")));
    }

    #[test]
    fn test_tier_poor_under_200_words() {
        let q = assess_content_quality(&interview_transcript(150, 4));
        assert_eq!(q.estimated_quality, QualityTier::Poor);
        assert!(q.warnings.iter().any(|w| w.contains("under 200 words")));
    }

    #[test]
    fn test_tier_fair_under_500_words() {
        let q = assess_content_quality(&interview_transcript(350, 4));
        assert_eq!(q.estimated_quality, QualityTier::Fair);
        assert!(q.warnings.iter().any(|w| w.contains("under 500 words")));
    }

    #[test]
    fn test_tier_good_under_1000_words() {
        let q = assess_content_quality(&interview_transcript(850, 6));
        assert_eq!(q.estimated_quality, QualityTier::Good);
    }

    #[test]
    fn test_tier_excellent_at_1000_words() {
        let q = assess_content_quality(&interview_transcript(1200, 8));
        assert_eq!(q.estimated_quality, QualityTier::Excellent);
    }

    #[test]
    fn test_good_transcript_with_enough_turns_has_no_warnings() {
        // 850 words, 6 turns, question marks present: the few-turns
        // warning needs < 5 turns and none of the other checks fire.
        let q = assess_content_quality(&interview_transcript(850, 6));
        assert!(q.speaker_turns >= 5);
        assert!(q.has_questions);
        assert!(q.warnings.is_empty(), "unexpected warnings: {:?}", q.warnings);
    }

    #[test]
    fn test_good_tier_with_few_turns_warns() {
        let mut text = String::from("Interviewer: tell me everything?\nCandidate: ");
        for _ in 0..700 {
            text.push_str("word ");
        }
        text.push_str("I worked with the team on a project to solve a problem.");
        let q = assess_content_quality(&text);
        assert_eq!(q.estimated_quality, QualityTier::Good);
        assert!(q.speaker_turns < 5);
        assert!(q.warnings.iter().any(|w| w.contains("Few speaker turns")));
    }

    #[test]
    fn test_limited_behavioral_content_warning() {
        // Over 200 words but no first-person or behavioral vocabulary.
        let mut text = String::from("Interviewer: ok?\nCandidate: yes\nAnswer: fine\n");
        for _ in 0..250 {
            text.push_str("metric ");
        }
        let q = assess_content_quality(&text);
        assert!(q
            .warnings
            .iter()
            .any(|w| w.contains("Limited behavioral content")));
    }

    #[test]
    fn test_behavioral_warning_not_emitted_for_short_text() {
        // Under the 200-word threshold the indicator check is skipped.
        let q = assess_content_quality("metric metric metric");
        assert!(!q
            .warnings
            .iter()
            .any(|w| w.contains("Limited behavioral content")));
    }

    #[test]
    fn test_gate_rejects_below_100_words() {
        let q = assess_content_quality(&interview_transcript(50, 2));
        let gate = should_proceed(&q);
        assert!(!gate.proceed);
        assert_eq!(gate.reason.as_deref(), Some(REJECTION_REASON));
    }

    #[test]
    fn test_gate_proceeds_for_poor_tier_above_floor() {
        let q = assess_content_quality(&interview_transcript(150, 4));
        assert_eq!(q.estimated_quality, QualityTier::Poor);
        let gate = should_proceed(&q);
        assert!(gate.proceed);
        assert!(gate.reason.is_none());
    }

    #[test]
    fn test_quality_score_bounded_for_huge_input() {
        let q = assess_content_quality(&interview_transcript(5000, 40));
        let score = quality_score(&q);
        assert!(score <= 100);
    }

    #[test]
    fn test_quality_score_zero_structure_floor() {
        let q = assess_content_quality("");
        // 0 words, 0 turns, no questions/responses: 0.2 * 50 = 10.
        assert_eq!(quality_score(&q), 10);
    }

    #[test]
    fn test_quality_score_blend() {
        let q = QualityMetrics {
            word_count: 500,
            sentence_count: 20,
            speaker_turns: 5,
            has_questions: true,
            has_responses: true,
            estimated_quality: QualityTier::Good,
            warnings: vec![],
            recommendations: vec![],
        };
        // 0.5*50 + 0.3*100 + 0.2*100 = 75
        assert_eq!(quality_score(&q), 75);
    }
}
