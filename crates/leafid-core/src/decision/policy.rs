//! Confidence thresholds.

use serde::{Deserialize, Serialize};

/// Below this confidence (percent) the result is an unreliable guess.
pub const UNKNOWN_THRESHOLD: f32 = 60.0;
/// Above this confidence the match is high-confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 90.0;
/// Above this confidence the match is good-confidence.
pub const GOOD_CONFIDENCE_THRESHOLD: f32 = 75.0;
/// Top-two gap (percentage points) under which the match is flagged ambiguous.
pub const TIE_MARGIN: f32 = 10.0;

/// Ordered thresholds for [`super::ConfidenceDecisionEngine`], all in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    pub unknown_threshold: f32,
    pub high_threshold: f32,
    pub good_threshold: f32,
    pub tie_margin: f32,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            unknown_threshold: UNKNOWN_THRESHOLD,
            high_threshold: HIGH_CONFIDENCE_THRESHOLD,
            good_threshold: GOOD_CONFIDENCE_THRESHOLD,
            tie_margin: TIE_MARGIN,
        }
    }
}

impl DecisionPolicy {
    /// Clamp into 0-100 and keep unknown <= good <= high.
    ///
    /// Non-finite values fall back to the defaults first.
    pub(crate) fn sanitize(&mut self) {
        self.unknown_threshold =
            finite_or(self.unknown_threshold, UNKNOWN_THRESHOLD).clamp(0.0, 100.0);
        self.good_threshold = finite_or(self.good_threshold, GOOD_CONFIDENCE_THRESHOLD)
            .clamp(self.unknown_threshold, 100.0);
        self.high_threshold = finite_or(self.high_threshold, HIGH_CONFIDENCE_THRESHOLD)
            .clamp(self.good_threshold, 100.0);
        self.tie_margin = finite_or(self.tie_margin, TIE_MARGIN).clamp(0.0, 100.0);
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
