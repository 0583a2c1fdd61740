//! Fraction of pixels falling inside hue/saturation bands

use image::DynamicImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::hsv::rgb_to_hsv;

/// A closed hue interval with an open saturation window, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueBand {
    pub hue_min: f32,
    pub hue_max: f32,
    /// Pixels must be strictly more saturated than this.
    pub saturation_min: f32,
    /// Pixels must be strictly less saturated than this.
    pub saturation_max: f32,
}

impl HueBand {
    /// Green foliage: roughly 60-180 degrees with some saturation.
    pub const GREEN: HueBand = HueBand {
        hue_min: 0.16,
        hue_max: 0.5,
        saturation_min: 0.2,
        saturation_max: f32::INFINITY,
    };

    /// Skin tones: orange-ish hues (0-36 degrees), neither grey nor vivid.
    pub const SKIN: HueBand = HueBand {
        hue_min: 0.0,
        hue_max: 0.1,
        saturation_min: 0.15,
        saturation_max: 0.7,
    };

    #[inline]
    pub fn contains(&self, h: f32, s: f32) -> bool {
        h >= self.hue_min && h <= self.hue_max && s > self.saturation_min && s < self.saturation_max
    }
}

/// Pixel ratios for the green and skin bands of one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HueBandRatios {
    pub green: f32,
    pub skin: f32,
}

/// Count the share of pixels inside `green` and `skin`.
pub fn hue_band_ratios(image: &DynamicImage, green: &HueBand, skin: &HueBand) -> HueBandRatios {
    let rgb = image.to_rgb8();
    let pixel_count = rgb.width() as u64 * rgb.height() as u64;
    if pixel_count == 0 {
        return HueBandRatios {
            green: 0.0,
            skin: 0.0,
        };
    }

    let row_len = rgb.width() as usize * 3;
    let (green_count, skin_count) = rgb
        .as_raw()
        .par_chunks(row_len)
        .map(|row| {
            let mut counts = (0u64, 0u64);
            for px in row.chunks_exact(3) {
                let hsv = rgb_to_hsv(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                );
                if green.contains(hsv.h, hsv.s) {
                    counts.0 += 1;
                }
                if skin.contains(hsv.h, hsv.s) {
                    counts.1 += 1;
                }
            }
            counts
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    HueBandRatios {
        green: (green_count as f64 / pixel_count as f64) as f32,
        skin: (skin_count as f64 / pixel_count as f64) as f32,
    }
}
