//! Color statistics over decoded images
//!
//! Provides the RGB -> HSV conversion, aggregate channel means
//! ([`ColorProfile`]) and per-pixel hue band ratios used by the leaf gate.

mod bands;
mod hsv;
mod profile;


// Re-export primary types
pub use hsv::{rgb_array_to_hsv, rgb_to_hsv, Hsv};
pub use profile::{profile, profile_with_hsv, ColorProfile, HsvMeans};

// Re-export hue band analysis
pub use bands::{hue_band_ratios, HueBand, HueBandRatios};
