//! Tunable thresholds for the leaf plausibility gate.

use serde::{Deserialize, Serialize};

use crate::color::HueBand;

/// Minimum accepted image edge, in pixels.
pub const MIN_IMAGE_DIMENSION: u32 = 50;
/// Green must exceed red and blue by this factor.
pub const GREEN_DOMINANCE_MARGIN: f32 = 1.1;
/// Mean luminance at or below this is too dark.
pub const DARK_THRESHOLD: f32 = 30.0;
/// Mean luminance at or above this is washed out.
pub const BRIGHT_THRESHOLD: f32 = 240.0;
/// Reject when more than this share of pixels is skin-toned.
pub const MAX_SKIN_RATIO: f32 = 0.15;
/// Reject when less than this share of pixels is green.
pub const MIN_GREEN_RATIO: f32 = 0.10;

/// Rule set for [`super::LeafPlausibilityGate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafPolicy {
    pub min_width: u32,
    pub min_height: u32,
    /// Multiplicative margin green must hold over both red and blue.
    pub green_margin: f32,
    pub dried_leaf: DriedLeafSignature,
    pub dark_threshold: f32,
    pub bright_threshold: f32,
    /// Per-pixel hue band checks. Disabled in the default rule set.
    pub hue_checks: HueChecks,
}

/// Channel-mean signature of a dried, brown leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriedLeafSignature {
    pub min_red: f32,
    pub min_green: f32,
    /// Maximum |red - green| gap.
    pub max_red_green_gap: f32,
}

/// Hue/saturation band checks run on every pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HueChecks {
    pub enabled: bool,
    pub max_skin_ratio: f32,
    pub min_green_ratio: f32,
    pub skin_band: HueBand,
    pub green_band: HueBand,
}

impl Default for LeafPolicy {
    fn default() -> Self {
        Self {
            min_width: MIN_IMAGE_DIMENSION,
            min_height: MIN_IMAGE_DIMENSION,
            green_margin: GREEN_DOMINANCE_MARGIN,
            dried_leaf: DriedLeafSignature::default(),
            dark_threshold: DARK_THRESHOLD,
            bright_threshold: BRIGHT_THRESHOLD,
            hue_checks: HueChecks::default(),
        }
    }
}

impl Default for DriedLeafSignature {
    fn default() -> Self {
        Self {
            min_red: 100.0,
            min_green: 80.0,
            max_red_green_gap: 30.0,
        }
    }
}

impl Default for HueChecks {
    fn default() -> Self {
        Self {
            enabled: false,
            max_skin_ratio: MAX_SKIN_RATIO,
            min_green_ratio: MIN_GREEN_RATIO,
            skin_band: HueBand::SKIN,
            green_band: HueBand::GREEN,
        }
    }
}

impl LeafPolicy {
    /// Looser color rule: 1.05 green margin and a 35-level brown gap.
    pub fn lenient() -> Self {
        Self {
            green_margin: 1.05,
            dried_leaf: DriedLeafSignature {
                max_red_green_gap: 35.0,
                ..DriedLeafSignature::default()
            },
            ..Self::default()
        }
    }

    /// Default rule set plus the skin-tone veto and green-pixel floor.
    pub fn strict() -> Self {
        Self {
            hue_checks: HueChecks {
                enabled: true,
                ..HueChecks::default()
            },
            ..Self::default()
        }
    }

    /// Resolve a named rule set ("standard", "lenient" or "strict").
    pub fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::default()),
            "lenient" => Some(Self::lenient()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }

    /// Clamp values into usable ranges. Non-finite values revert to defaults.
    pub(crate) fn sanitize(&mut self) {
        let dried = DriedLeafSignature::default();
        self.min_width = self.min_width.max(1);
        self.min_height = self.min_height.max(1);
        self.green_margin = finite_or(self.green_margin, GREEN_DOMINANCE_MARGIN).clamp(1.0, 3.0);
        self.dark_threshold = finite_or(self.dark_threshold, DARK_THRESHOLD).clamp(0.0, 254.0);
        self.bright_threshold = finite_or(self.bright_threshold, BRIGHT_THRESHOLD)
            .clamp(self.dark_threshold + 1.0, 255.0);
        self.dried_leaf.min_red =
            finite_or(self.dried_leaf.min_red, dried.min_red).clamp(0.0, 255.0);
        self.dried_leaf.min_green =
            finite_or(self.dried_leaf.min_green, dried.min_green).clamp(0.0, 255.0);
        self.dried_leaf.max_red_green_gap =
            finite_or(self.dried_leaf.max_red_green_gap, dried.max_red_green_gap).clamp(0.0, 255.0);
        self.hue_checks.max_skin_ratio =
            finite_or(self.hue_checks.max_skin_ratio, MAX_SKIN_RATIO).clamp(0.0, 1.0);
        self.hue_checks.min_green_ratio =
            finite_or(self.hue_checks.min_green_ratio, MIN_GREEN_RATIO).clamp(0.0, 1.0);
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
