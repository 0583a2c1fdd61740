//! Tests for the leaf plausibility gate

use super::*;
use image::{DynamicImage, Rgb, RgbImage};

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

fn rejection(verdict: &LeafVerdict) -> RejectionReason {
    verdict.rejection.expect("verdict should be a rejection")
}

// ========================================================================
// Size check
// ========================================================================

#[test]
fn test_small_images_rejected_regardless_of_color() {
    let gate = LeafPlausibilityGate::default();
    let colors = [[40, 160, 50], [224, 172, 145], [0, 0, 0], [255, 255, 255]];
    let sizes = [(49, 200), (200, 49), (10, 10), (1, 1), (49, 49)];

    for rgb in colors {
        for (w, h) in sizes {
            let verdict = gate.evaluate(&solid(w, h, rgb));
            assert!(!verdict.accepted, "{}x{} {:?} should be rejected", w, h, rgb);
            assert!(matches!(rejection(&verdict), RejectionReason::TooSmall { .. }));
            assert!(verdict.reason.contains("too small"));
            assert!(verdict.profile.is_none());
        }
    }
}

#[test]
fn test_minimum_size_is_inclusive() {
    let gate = LeafPlausibilityGate::default();
    let verdict = gate.evaluate(&solid(50, 50, [40, 160, 50]));
    assert!(verdict.accepted, "{}", verdict.reason);
}

// ========================================================================
// Color dominance
// ========================================================================

#[test]
fn test_green_dominant_images_accepted() {
    let gate = LeafPlausibilityGate::default();
    for rgb in [[40, 160, 50], [90, 110, 80], [20, 60, 30], [150, 200, 120]] {
        let verdict = gate.evaluate(&solid(64, 64, rgb));
        assert!(verdict.accepted, "{:?}: {}", rgb, verdict.reason);
        assert!(verdict.rejection.is_none());
    }
}

#[test]
fn test_green_must_beat_both_channels() {
    let gate = LeafPlausibilityGate::default();
    // Green beats red but not blue (teal)
    let verdict = gate.evaluate(&solid(64, 64, [50, 150, 145]));
    assert_eq!(rejection(&verdict), RejectionReason::NoLeafColor);
}

#[test]
fn test_skin_tone_image_has_no_leaf_color() {
    let gate = LeafPlausibilityGate::default();
    let verdict = gate.evaluate(&solid(64, 64, [224, 172, 145]));
    assert!(!verdict.accepted);
    assert_eq!(rejection(&verdict), RejectionReason::NoLeafColor);
    assert!(verdict.reason.contains("No plant-leaf color"));
    assert!(verdict.profile.is_some());
}

#[test]
fn test_dried_leaf_signature_accepted() {
    let gate = LeafPlausibilityGate::default();
    // Brown: red and green close, blue well below
    let verdict = gate.evaluate(&solid(64, 64, [140, 120, 60]));
    assert!(verdict.accepted, "{}", verdict.reason);
}

#[test]
fn test_dried_leaf_gap_boundary() {
    let gate = LeafPlausibilityGate::default();
    // |r - g| == 30 fails the strict "< 30" rule in the default policy
    let verdict = gate.evaluate(&solid(64, 64, [150, 120, 60]));
    assert_eq!(rejection(&verdict), RejectionReason::NoLeafColor);

    // ...but passes the lenient policy's 35 gap
    let lenient = LeafPlausibilityGate::new(LeafPolicy::lenient());
    assert!(lenient.evaluate(&solid(64, 64, [150, 120, 60])).accepted);
}

#[test]
fn test_lenient_margin() {
    // 105 vs 100: 5% dominance only
    let img = solid(64, 64, [100, 106, 100]);
    assert!(!LeafPlausibilityGate::default().evaluate(&img).accepted);
    assert!(LeafPlausibilityGate::new(LeafPolicy::lenient()).evaluate(&img).accepted);
}

// ========================================================================
// Brightness
// ========================================================================

#[test]
fn test_dark_green_image_rejected_by_brightness() {
    let gate = LeafPlausibilityGate::default();
    // Clearly green-dominant but mean brightness ~16.7
    let verdict = gate.evaluate(&solid(64, 64, [5, 40, 5]));
    assert!(matches!(rejection(&verdict), RejectionReason::TooDark { .. }));
    assert_eq!(rejection(&verdict).check_name(), "brightness");
}

#[test]
fn test_brightness_thresholds_are_inclusive() {
    let gate = LeafPlausibilityGate::default();
    // Mean exactly 30.0 with green dominance: (10, 70, 10)
    let verdict = gate.evaluate(&solid(64, 64, [10, 70, 10]));
    assert!(matches!(rejection(&verdict), RejectionReason::TooDark { .. }));
}

#[test]
fn test_overexposed_leaf_color_still_rejected() {
    let gate = LeafPlausibilityGate::default();
    // Passes the dried-leaf branch (r > 100, g > 80, |r-g| < 30, b < g)
    // but the mean is ~246.7
    let img = solid(64, 64, [250, 250, 240]);
    assert!(gate.has_leaf_color(&crate::color::profile(&img)));
    let verdict = gate.evaluate(&img);
    assert!(matches!(rejection(&verdict), RejectionReason::TooBright { .. }));
}

#[test]
fn test_overexposed_green_dominant_rejected_with_lenient_margin() {
    let gate = LeafPlausibilityGate::new(LeafPolicy::lenient());
    // 255 > 240 * 1.05 = 252, mean 245
    let img = solid(64, 64, [240, 255, 240]);
    assert!(is_green_dominant(&crate::color::profile(&img), 1.05));
    let verdict = gate.evaluate(&img);
    assert!(matches!(rejection(&verdict), RejectionReason::TooBright { .. }));
}

// ========================================================================
// Hue checks (strict policy)
// ========================================================================

#[test]
fn test_strict_policy_vetoes_skin_before_color() {
    let gate = LeafPlausibilityGate::new(LeafPolicy::strict());
    // 40% skin, 60% saturated green: mean is still green-dominant
    let img = RgbImage::from_fn(100, 100, |_, y| {
        if y < 40 {
            Rgb([224, 172, 145])
        } else {
            Rgb([30, 170, 40])
        }
    });
    let img = DynamicImage::ImageRgb8(img);
    assert!(gate.has_leaf_color(&crate::color::profile(&img)));

    let verdict = gate.evaluate(&img);
    match rejection(&verdict) {
        RejectionReason::SkinTone { ratio, limit } => {
            assert!((ratio - 0.4).abs() < 1e-6);
            assert_eq!(limit, MAX_SKIN_RATIO);
        }
        other => panic!("expected skin tone rejection, got {:?}", other),
    }
    assert!(verdict.reason.contains("person"));
    assert!(verdict.hue_ratios.is_some());

    // The default rule set ignores per-pixel hue and accepts it
    assert!(LeafPlausibilityGate::default().evaluate(&img).accepted);
}

#[test]
fn test_strict_policy_green_floor() {
    let gate = LeafPlausibilityGate::new(LeafPolicy::strict());
    // Green-dominant mean but washed-out saturation (s ~ 0.13) on every pixel
    let verdict = gate.evaluate(&solid(64, 64, [100, 115, 100]));
    assert!(matches!(
        rejection(&verdict),
        RejectionReason::InsufficientGreen { .. }
    ));
}

#[test]
fn test_strict_policy_accepts_clean_leaf() {
    let gate = LeafPlausibilityGate::new(LeafPolicy::strict());
    let verdict = gate.evaluate(&solid(80, 60, [40, 160, 50]));
    assert!(verdict.accepted, "{}", verdict.reason);
    let ratios = verdict.hue_ratios.expect("ratios recorded");
    assert_eq!(ratios.green, 1.0);
}

#[test]
fn test_named_policies() {
    assert_eq!(LeafPolicy::named("standard"), Some(LeafPolicy::default()));
    assert_eq!(LeafPolicy::named("STRICT"), Some(LeafPolicy::strict()));
    assert!(LeafPolicy::named("paranoid").is_none());
}

#[test]
fn test_sanitize_orders_brightness_bounds() {
    let mut policy = LeafPolicy {
        dark_threshold: 200.0,
        bright_threshold: 100.0,
        green_margin: 0.5,
        ..LeafPolicy::default()
    };
    policy.sanitize();
    assert!(policy.bright_threshold > policy.dark_threshold);
    assert_eq!(policy.green_margin, 1.0);
}

#[test]
fn test_hue_means_reported_only_with_hue_checks() {
    let image = solid(80, 80, [40, 160, 50]);

    let standard = LeafPlausibilityGate::default().evaluate(&image);
    assert!(standard.profile.unwrap().hsv.is_none());
    assert!(standard.hue_ratios.is_none());

    let strict = LeafPlausibilityGate::new(LeafPolicy::strict()).evaluate(&image);
    let hsv = strict.profile.unwrap().hsv.unwrap();
    assert!(hsv.hue > 0.3 && hsv.hue < 0.4);
    assert_eq!(strict.hue_ratios.unwrap().green, 1.0);
}
