//! Keyword severity heuristic.
//!
//! Scores the raw record text, not the classifier's explanation. Rules are
//! checked in table order and the first keyword found wins, so "hate"
//! outranks everything else even though "discriminatory" maps to a higher
//! score than "offensive".

use serde::{Deserialize, Serialize};

/// Integer severity written to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const LOW: Severity = Severity(1);
    pub const MEDIUM: Severity = Severity(7);
    pub const HIGH: Severity = Severity(8);
    pub const VERY_HIGH: Severity = Severity(10);

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            10 => "very high",
            8 => "high",
            7 => "medium",
            _ => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

/// Keyword rules in priority order.
pub const SEVERITY_RULES: &[(&str, Severity)] = &[
    ("hate", Severity::VERY_HIGH),
    ("offensive", Severity::MEDIUM),
    ("discriminatory", Severity::HIGH),
];

/// Score a text by the first rule whose keyword appears in it, ignoring case.
pub fn score(text: &str) -> Severity {
    let lowered = text.to_lowercase();
    SEVERITY_RULES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::LOW)
}
