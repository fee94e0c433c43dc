//! Declared output schema for the OCEAN assessment.
//!
//! The 5-domain / 6-facet structure, numeric ranges, and canonical facet
//! names are declared once here and reused by the validator, the score
//! transformer, the evidence enricher, and test fixtures.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// One of the five OCEAN trait domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    O,
    C,
    E,
    A,
    N,
}

impl Domain {
    /// Canonical domain order used everywhere scores are iterated.
    pub const ALL: [Domain; 5] = [Domain::O, Domain::C, Domain::E, Domain::A, Domain::N];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::O => "O",
            Domain::C => "C",
            Domain::E => "E",
            Domain::A => "A",
            Domain::N => "N",
        }
    }

    pub fn parse(s: &str) -> Option<Domain> {
        match s {
            "O" => Some(Domain::O),
            "C" => Some(Domain::C),
            "E" => Some(Domain::E),
            "A" => Some(Domain::A),
            "N" => Some(Domain::N),
            _ => None,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facet indices within a domain. Always exactly 1..=6.
pub const FACET_INDICES: RangeInclusive<u32> = 1..=6;

/// Valid range for a single facet score. Values are checked as numbers,
/// not clamped — out-of-range is a validation failure.
pub const FACET_SCORE_RANGE: RangeInclusive<f64> = 1.0..=5.0;

/// Valid range for confidence values, overall and per-evidence.
pub const CONFIDENCE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Canonical facet name lookup (Johnson 120 IPIP-NEO-PI-R naming).
/// Returns `None` for out-of-range indices; callers fall back to a
/// synthetic label rather than failing.
pub fn facet_name(domain: Domain, index: i64) -> Option<&'static str> {
    let names: &[&'static str; 6] = match domain {
        Domain::O => &[
            "Imagination",
            "Artistic Interests",
            "Emotionality",
            "Adventurousness",
            "Intellect",
            "Liberalism",
        ],
        Domain::C => &[
            "Self-Efficacy",
            "Orderliness",
            "Dutifulness",
            "Achievement-Striving",
            "Self-Discipline",
            "Cautiousness",
        ],
        Domain::E => &[
            "Friendliness",
            "Gregariousness",
            "Assertiveness",
            "Activity Level",
            "Excitement-Seeking",
            "Cheerfulness",
        ],
        Domain::A => &[
            "Trust",
            "Morality",
            "Altruism",
            "Cooperation",
            "Modesty",
            "Sympathy",
        ],
        Domain::N => &[
            "Anxiety",
            "Anger",
            "Depression",
            "Self-Consciousness",
            "Immoderation",
            "Vulnerability",
        ],
    };

    if (1..=6).contains(&index) {
        Some(names[(index - 1) as usize])
    } else {
        None
    }
}
