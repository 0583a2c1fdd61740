//! Gate outcome types.

use std::fmt;

use serde::Serialize;

use crate::color::{ColorProfile, HueBandRatios};

/// Which check turned an image away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum RejectionReason {
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
    NoLeafColor,
    SkinTone {
        ratio: f32,
        limit: f32,
    },
    InsufficientGreen {
        ratio: f32,
        floor: f32,
    },
    TooDark {
        brightness: f32,
        threshold: f32,
    },
    TooBright {
        brightness: f32,
        threshold: f32,
    },
}

impl RejectionReason {
    /// Short machine-friendly name of the failed check.
    pub fn check_name(&self) -> &'static str {
        match self {
            RejectionReason::TooSmall { .. } => "size",
            RejectionReason::NoLeafColor => "color",
            RejectionReason::SkinTone { .. } => "skin_tone",
            RejectionReason::InsufficientGreen { .. } => "green_ratio",
            RejectionReason::TooDark { .. } | RejectionReason::TooBright { .. } => "brightness",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::TooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "Image too small ({}x{}, minimum {}x{}). Please upload a larger image.",
                width, height, min_width, min_height
            ),
            RejectionReason::NoLeafColor => write!(
                f,
                "No plant-leaf color detected. Only green or dried brown leaves can be identified."
            ),
            RejectionReason::SkinTone { ratio, .. } => write!(
                f,
                "Skin tones cover {:.0}% of the image; this looks like a photo of a person, not a leaf.",
                ratio * 100.0
            ),
            RejectionReason::InsufficientGreen { ratio, .. } => write!(
                f,
                "Only {:.0}% of the image is green; please upload a clear leaf image with visible green color.",
                ratio * 100.0
            ),
            RejectionReason::TooDark { brightness, .. } => {
                write!(f, "Image too dark (mean brightness {:.0}).", brightness)
            }
            RejectionReason::TooBright { brightness, .. } => write!(
                f,
                "Image too bright or washed out (mean brightness {:.0}).",
                brightness
            ),
        }
    }
}

/// Result of [`super::LeafPlausibilityGate::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafVerdict {
    pub accepted: bool,
    /// Human-readable explanation, naming the failed check when rejected.
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionReason>,
    /// Absent only when the size check failed before profiling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ColorProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue_ratios: Option<HueBandRatios>,
}

impl LeafVerdict {
    pub(crate) fn accepted(profile: ColorProfile, hue_ratios: Option<HueBandRatios>) -> Self {
        Self {
            accepted: true,
            reason: "Image looks like a plant leaf.".to_string(),
            rejection: None,
            profile: Some(profile),
            hue_ratios,
        }
    }

    pub(crate) fn rejected(
        reason: RejectionReason,
        profile: Option<ColorProfile>,
        hue_ratios: Option<HueBandRatios>,
    ) -> Self {
        Self {
            accepted: false,
            reason: reason.to_string(),
            rejection: Some(reason),
            profile,
            hue_ratios,
        }
    }
}
