//! Aggregate channel means for a decoded image

use image::DynamicImage;
use rayon::prelude::*;
use serde::Serialize;

use super::hsv::rgb_to_hsv;

/// Mean color statistics of one image.
///
/// Channel means are on the 0-255 scale. The HSV means are either fully
/// present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorProfile {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsv: Option<HsvMeans>,
}

/// Mean hue and saturation in normalized [0, 1] HSV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HsvMeans {
    pub hue: f32,
    pub saturation: f32,
}

impl ColorProfile {
    /// Overall mean luminance: the average of the three channel means.
    pub fn brightness(&self) -> f32 {
        (self.red + self.green + self.blue) / 3.0
    }
}

/// Compute per-channel means of an image.
///
/// Non-RGB images are expanded to three channels first (a single channel is
/// replicated). Sums are accumulated as integers, so the result does not
/// depend on how rayon splits the rows.
pub fn profile(image: &DynamicImage) -> ColorProfile {
    let rgb = image.to_rgb8();
    let pixel_count = rgb.width() as u64 * rgb.height() as u64;
    if pixel_count == 0 {
        return ColorProfile {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            hsv: None,
        };
    }

    let row_len = rgb.width() as usize * 3;
    let sums = rgb
        .as_raw()
        .par_chunks(row_len)
        .map(|row| {
            let mut acc = [0u64; 3];
            for px in row.chunks_exact(3) {
                acc[0] += px[0] as u64;
                acc[1] += px[1] as u64;
                acc[2] += px[2] as u64;
            }
            acc
        })
        .reduce(|| [0u64; 3], |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]]);

    let count = pixel_count as f64;
    ColorProfile {
        red: (sums[0] as f64 / count) as f32,
        green: (sums[1] as f64 / count) as f32,
        blue: (sums[2] as f64 / count) as f32,
        hsv: None,
    }
}

/// Compute channel means plus mean hue and saturation.
pub fn profile_with_hsv(image: &DynamicImage) -> ColorProfile {
    let mut base = profile(image);

    let rgb = image.to_rgb8();
    let pixel_count = rgb.width() as u64 * rgb.height() as u64;
    if pixel_count == 0 {
        base.hsv = Some(HsvMeans {
            hue: 0.0,
            saturation: 0.0,
        });
        return base;
    }

    // Per-row partial sums are collected in order and folded sequentially
    // so the floating-point total is reproducible.
    let row_len = rgb.width() as usize * 3;
    let partials: Vec<(f64, f64)> = rgb
        .as_raw()
        .par_chunks(row_len)
        .map(|row| {
            row.chunks_exact(3).fold((0.0f64, 0.0f64), |(h, s), px| {
                let hsv = rgb_to_hsv(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                );
                (h + hsv.h as f64, s + hsv.s as f64)
            })
        })
        .collect();

    let (hue_sum, sat_sum) = partials
        .iter()
        .fold((0.0f64, 0.0f64), |(h, s), &(rh, rs)| (h + rh, s + rs));

    let count = pixel_count as f64;
    base.hsv = Some(HsvMeans {
        hue: (hue_sum / count) as f32,
        saturation: (sat_sum / count) as f32,
    });
    base
}
