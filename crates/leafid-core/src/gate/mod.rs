//! Leaf plausibility gate
//!
//! Cheap color-space checks that turn away obviously invalid photos (people,
//! objects, blank or exposure-ruined frames) before any inference runs.
//! Checks run cheapest first and stop at the first failure:
//!
//! 1. size
//! 2. skin-tone veto (only when hue checks are enabled)
//! 3. color dominance: green over red and blue, or a dried-leaf signature
//! 4. green pixel floor (only when hue checks are enabled)
//! 5. brightness

mod policy;
mod verdict;

#[cfg(test)]
mod tests;

pub use policy::{
    DriedLeafSignature, HueChecks, LeafPolicy, BRIGHT_THRESHOLD, DARK_THRESHOLD,
    GREEN_DOMINANCE_MARGIN, MAX_SKIN_RATIO, MIN_GREEN_RATIO, MIN_IMAGE_DIMENSION,
};
pub use verdict::{LeafVerdict, RejectionReason};

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::color::{self, ColorProfile};

/// Heuristic pass/fail gate in front of the classifier.
#[derive(Debug, Clone, Default)]
pub struct LeafPlausibilityGate {
    policy: LeafPolicy,
}

impl LeafPlausibilityGate {
    pub fn new(policy: LeafPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LeafPolicy {
        &self.policy
    }

    /// Evaluate one decoded image. Never fails; the verdict carries the reason.
    pub fn evaluate(&self, image: &DynamicImage) -> LeafVerdict {
        let (width, height) = image.dimensions();
        if width < self.policy.min_width || height < self.policy.min_height {
            return LeafVerdict::rejected(
                RejectionReason::TooSmall {
                    width,
                    height,
                    min_width: self.policy.min_width,
                    min_height: self.policy.min_height,
                },
                None,
                None,
            );
        }

        let profile = if self.policy.hue_checks.enabled {
            color::profile_with_hsv(image)
        } else {
            color::profile(image)
        };
        debug!(
            red = profile.red,
            green = profile.green,
            blue = profile.blue,
            "Leaf gate color profile"
        );

        let ratios = if self.policy.hue_checks.enabled {
            let checks = &self.policy.hue_checks;
            let ratios = color::hue_band_ratios(image, &checks.green_band, &checks.skin_band);
            debug!(green = ratios.green, skin = ratios.skin, "Leaf gate hue ratios");
            if ratios.skin > checks.max_skin_ratio {
                return LeafVerdict::rejected(
                    RejectionReason::SkinTone {
                        ratio: ratios.skin,
                        limit: checks.max_skin_ratio,
                    },
                    Some(profile),
                    Some(ratios),
                );
            }
            Some(ratios)
        } else {
            None
        };

        if !self.has_leaf_color(&profile) {
            return LeafVerdict::rejected(RejectionReason::NoLeafColor, Some(profile), ratios);
        }

        if let Some(ratios) = ratios {
            let floor = self.policy.hue_checks.min_green_ratio;
            if ratios.green < floor {
                return LeafVerdict::rejected(
                    RejectionReason::InsufficientGreen {
                        ratio: ratios.green,
                        floor,
                    },
                    Some(profile),
                    Some(ratios),
                );
            }
        }

        let brightness = profile.brightness();
        if brightness <= self.policy.dark_threshold {
            return LeafVerdict::rejected(
                RejectionReason::TooDark {
                    brightness,
                    threshold: self.policy.dark_threshold,
                },
                Some(profile),
                ratios,
            );
        }
        if brightness >= self.policy.bright_threshold {
            return LeafVerdict::rejected(
                RejectionReason::TooBright {
                    brightness,
                    threshold: self.policy.bright_threshold,
                },
                Some(profile),
                ratios,
            );
        }

        LeafVerdict::accepted(profile, ratios)
    }

    /// Green dominance or a dried-leaf signature.
    pub fn has_leaf_color(&self, profile: &ColorProfile) -> bool {
        is_green_dominant(profile, self.policy.green_margin)
            || is_dried_leaf(profile, &self.policy.dried_leaf)
    }
}

/// Green mean exceeds both red and blue means by `margin`.
pub fn is_green_dominant(profile: &ColorProfile, margin: f32) -> bool {
    profile.green > profile.red * margin && profile.green > profile.blue * margin
}

/// Warm, brownish means typical of a dried leaf.
pub fn is_dried_leaf(profile: &ColorProfile, signature: &DriedLeafSignature) -> bool {
    profile.red > signature.min_red
        && profile.green > signature.min_green
        && (profile.red - profile.green).abs() < signature.max_red_green_gap
        && profile.blue < profile.green
}
