//! HSV (Hue-Saturation-Value) conversion in normalized [0, 1] space

/// HSV color representation
/// - H (hue): 0.0-1.0 (fraction of a full turn, 1/3 = green)
/// - S (saturation): 0.0-1.0
/// - V (value): 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Convert RGB to HSV
///
/// Input: RGB values in range 0.0-1.0
/// Output: HSV with every component in 0.0-1.0
#[inline]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let r = r.clamp(0.0, 1.0);
    let g = g.clamp(0.0, 1.0);
    let b = b.clamp(0.0, 1.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    // Achromatic case
    if delta < 1e-6 {
        return Hsv { h: 0.0, s, v };
    }

    let sector = if max == r {
        (g - b) / delta
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let mut h = sector / 6.0;
    if h < 0.0 {
        h += 1.0;
    }

    Hsv { h: h % 1.0, s, v }
}

/// Convert interleaved 8-bit RGB triplets to HSV
pub fn rgb_array_to_hsv(data: &[u8]) -> Vec<Hsv> {
    data.chunks_exact(3)
        .map(|rgb| {
            rgb_to_hsv(
                rgb[0] as f32 / 255.0,
                rgb[1] as f32 / 255.0,
                rgb[2] as f32 / 255.0,
            )
        })
        .collect()
}
