use super::*;
use crate::catalog::SpeciesCatalog;
use crate::error::LeafError;

fn catalog() -> SpeciesCatalog {
    SpeciesCatalog::new("test", ["Basale", "Curry", "Neem", "Tulsi"]).unwrap()
}

fn engine() -> ConfidenceDecisionEngine {
    ConfidenceDecisionEngine::default()
}

#[test]
fn test_below_floor_is_unknown_and_never_ambiguous() {
    let decision = engine()
        .decide(&[0.55, 0.10, 0.20, 0.15], &catalog())
        .unwrap();
    assert_eq!(decision.tier, ConfidenceTier::Unknown);
    assert!(!decision.ambiguous_tie);
    assert!(!decision.is_reliable());
    assert_eq!(decision.predicted_species, "Basale");
    assert!(decision.ambiguity_note().is_none());
}

#[test]
fn test_unknown_with_close_runner_up_is_not_ambiguous() {
    // 45 vs 44 would be a tie, but the floor takes precedence
    let decision = engine()
        .decide(&[0.45, 0.44, 0.06, 0.05], &catalog())
        .unwrap();
    assert_eq!(decision.tier, ConfidenceTier::Unknown);
    assert!(!decision.ambiguous_tie);
    assert_eq!(decision.runner_up_species.as_deref(), Some("Curry"));
}

#[test]
fn test_good_confidence_with_close_runner_up() {
    let decision = engine()
        .decide(&[0.0, 0.74, 0.80, 0.0], &catalog())
        .unwrap();
    assert_eq!(
        decision.tier,
        ConfidenceTier::Confident(ConfidenceStrength::Good)
    );
    assert!(decision.ambiguous_tie);
    assert_eq!(decision.predicted_species, "Neem");
    assert_eq!(decision.runner_up_species.as_deref(), Some("Curry"));
    let runner = decision.runner_up_confidence.unwrap();
    assert!((runner - 74.0).abs() < 1e-3);

    let note = decision.ambiguity_note().unwrap();
    assert!(note.contains("Curry"));
    assert!(note.contains("74.00%"));
}

#[test]
fn test_high_confidence_clear_winner() {
    let decision = engine()
        .decide(&[0.01, 0.01, 0.02, 0.96], &catalog())
        .unwrap();
    assert_eq!(
        decision.tier,
        ConfidenceTier::Confident(ConfidenceStrength::High)
    );
    assert!(!decision.ambiguous_tie);
    assert_eq!(decision.predicted_species, "Tulsi");
    assert_eq!(decision.predicted_index, 3);
    assert!((decision.confidence - 96.0).abs() < 1e-3);
}

#[test]
fn test_moderate_band() {
    let decision = engine()
        .decide(&[0.70, 0.10, 0.10, 0.10], &catalog())
        .unwrap();
    assert_eq!(decision.tier, ConfidenceTier::Moderate);
    assert!(!decision.ambiguous_tie);
    assert!(decision.is_reliable());
}

#[test]
fn test_tier_boundaries() {
    let engine = engine();
    assert_eq!(engine.tier_for(59.99), ConfidenceTier::Unknown);
    assert_eq!(engine.tier_for(60.0), ConfidenceTier::Moderate);
    assert_eq!(engine.tier_for(75.0), ConfidenceTier::Moderate);
    assert_eq!(
        engine.tier_for(75.5),
        ConfidenceTier::Confident(ConfidenceStrength::Good)
    );
    assert_eq!(
        engine.tier_for(90.0),
        ConfidenceTier::Confident(ConfidenceStrength::Good)
    );
    assert_eq!(
        engine.tier_for(90.5),
        ConfidenceTier::Confident(ConfidenceStrength::High)
    );
}

#[test]
fn test_prediction_matches_catalog_position() {
    let catalog = catalog();
    for i in 0..catalog.len() {
        let mut probs = vec![0.1; catalog.len()];
        probs[i] = 0.7;
        let decision = engine().decide(&probs, &catalog).unwrap();
        assert_eq!(decision.predicted_index, i);
        assert_eq!(decision.predicted_species, &catalog[i]);
    }
}

#[test]
fn test_exact_tie_resolves_to_catalog_order() {
    let decision = engine()
        .decide(&[0.1, 0.4, 0.1, 0.4], &catalog())
        .unwrap();
    assert_eq!(decision.predicted_species, "Curry");
    assert_eq!(decision.runner_up_species.as_deref(), Some("Tulsi"));
}

#[test]
fn test_length_mismatch_is_configuration_error() {
    let err = engine().decide(&[0.5, 0.5], &catalog()).unwrap_err();
    assert!(matches!(err, LeafError::Configuration(_)));
    assert!(err.is_fatal());

    let err = engine().decide(&[], &catalog()).unwrap_err();
    assert!(matches!(err, LeafError::Configuration(_)));
}

#[test]
fn test_malformed_vectors_are_inference_failures() {
    let catalog = catalog();
    let zeros = engine().decide(&[0.0; 4], &catalog).unwrap_err();
    assert!(matches!(zeros, LeafError::InferenceFailed(_)));

    let nan = engine()
        .decide(&[0.5, f32::NAN, 0.25, 0.25], &catalog)
        .unwrap_err();
    assert!(matches!(nan, LeafError::InferenceFailed(_)));

    let negative = engine()
        .decide(&[1.1, -0.1, 0.0, 0.0], &catalog)
        .unwrap_err();
    assert!(matches!(negative, LeafError::InferenceFailed(_)));
}

#[test]
fn test_single_species_catalog_has_no_runner_up() {
    let catalog = SpeciesCatalog::new("one", ["Neem"]).unwrap();
    let decision = engine().decide(&[1.0], &catalog).unwrap();
    assert_eq!(decision.runner_up_species, None);
    assert_eq!(decision.runner_up_confidence, None);
    assert!(!decision.ambiguous_tie);
}

#[test]
fn test_custom_policy() {
    let engine = ConfidenceDecisionEngine::new(DecisionPolicy {
        unknown_threshold: 70.0,
        tie_margin: 2.0,
        ..DecisionPolicy::default()
    });
    let decision = engine.decide(&[0.65, 0.35, 0.0, 0.0], &catalog()).unwrap();
    assert_eq!(decision.tier, ConfidenceTier::Unknown);

    let decision = engine.decide(&[0.80, 0.0, 0.0, 0.74], &catalog()).unwrap();
    assert!(!decision.ambiguous_tie);
}

#[test]
fn test_policy_sanitize_keeps_bands_ordered() {
    let mut policy = DecisionPolicy {
        unknown_threshold: 120.0,
        good_threshold: 10.0,
        high_threshold: -5.0,
        tie_margin: -1.0,
    };
    policy.sanitize();
    assert_eq!(policy.unknown_threshold, 100.0);
    assert_eq!(policy.good_threshold, 100.0);
    assert_eq!(policy.high_threshold, 100.0);
    assert_eq!(policy.tie_margin, 0.0);
}

#[test]
fn test_probability_vector_validation() {
    assert!(ProbabilityVector::normalized(vec![0.5, 0.5], PROBABILITY_SUM_EPSILON).is_ok());
    let err = ProbabilityVector::normalized(vec![0.5, 0.6], PROBABILITY_SUM_EPSILON).unwrap_err();
    assert!(matches!(err, LeafError::InferenceFailed(_)));
    assert!(matches!(
        ProbabilityVector::new(Vec::new()),
        Err(LeafError::Configuration(_))
    ));
}

#[test]
fn test_softmax_of_logits() {
    let vector = ProbabilityVector::from_logits(&[1.0, 3.0, 2.0]).unwrap();
    assert!((vector.sum() - 1.0).abs() < 1e-5);
    assert_eq!(vector.ranked_indices(), vec![1, 2, 0]);

    // Large logits must not overflow
    let vector = ProbabilityVector::from_logits(&[1000.0, 999.0]).unwrap();
    assert!(vector.as_slice().iter().all(|v| v.is_finite()));
    assert!(vector.as_slice()[0] > vector.as_slice()[1]);
}

#[test]
fn test_headlines_differ_per_tier() {
    let tiers = [
        ConfidenceTier::Confident(ConfidenceStrength::High),
        ConfidenceTier::Confident(ConfidenceStrength::Good),
        ConfidenceTier::Moderate,
        ConfidenceTier::Unknown,
    ];
    for (i, a) in tiers.iter().enumerate() {
        for b in &tiers[i + 1..] {
            assert_ne!(a.headline(), b.headline());
        }
    }
    assert!(ConfidenceTier::Unknown.headline().contains("unreliable"));
}
