//! End-to-end identification with a scripted model standing in for the
//! trained network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};
use leafid_core::classifier::{OutputKind, SpeciesClassifier, SpeciesModel};
use leafid_core::decision::{ConfidenceStrength, ConfidenceTier};
use leafid_core::gate::RejectionReason;
use leafid_core::metadata::{MetadataTable, SpeciesMetadataStore};
use leafid_core::narration::decision_narration;
use leafid_core::normalize::Tensor;
use leafid_core::{Identification, LeafError, LeafIdConfig, LeafIdentifier, SpeciesCatalog};

/// Returns a probability vector peaked on one species, counting calls.
struct ScriptedModel {
    peaks: Vec<(usize, f32)>,
    calls: Arc<AtomicUsize>,
    size: usize,
}

impl SpeciesModel for ScriptedModel {
    fn infer(&mut self, input: &Tensor) -> leafid_core::Result<Vec<f32>> {
        assert_eq!(input.dim(), (1, 224, 224, 3));
        assert!(input.iter().all(|v| (0.0..=1.0).contains(v)));
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut out = vec![0.0; self.size];
        let assigned: f32 = self.peaks.iter().map(|(_, p)| p).sum();
        let rest = (1.0 - assigned) / (self.size - self.peaks.len()) as f32;
        out.iter_mut().for_each(|v| *v = rest);
        for &(i, p) in &self.peaks {
            out[i] = p;
        }
        Ok(out)
    }
}

fn catalog() -> Arc<SpeciesCatalog> {
    Arc::new(MetadataTable::reference().catalog().unwrap())
}

fn identifier(peaks: Vec<(&str, f32)>) -> (LeafIdentifier, Arc<AtomicUsize>) {
    identifier_with(&LeafIdConfig::default(), peaks)
}

fn identifier_with(
    config: &LeafIdConfig,
    peaks: Vec<(&str, f32)>,
) -> (LeafIdentifier, Arc<AtomicUsize>) {
    let catalog = catalog();
    let calls = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel {
        peaks: peaks
            .into_iter()
            .map(|(name, p)| (catalog.index_of(name).unwrap(), p))
            .collect(),
        calls: Arc::clone(&calls),
        size: catalog.len(),
    };
    let classifier = SpeciesClassifier::from_model(Box::new(model), catalog, OutputKind::Probabilities);
    (LeafIdentifier::from_config(config, classifier), calls)
}

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

fn leaf() -> DynamicImage {
    solid(320, 240, [50, 140, 40])
}

#[test]
fn test_confident_identification_of_a_leaf() {
    let (identifier, calls) = identifier(vec![("Tulsi", 0.96)]);
    let outcome = identifier.identify(&leaf(), false).unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.decision.predicted_species, "Tulsi");
    assert_eq!(
        report.decision.tier,
        ConfidenceTier::Confident(ConfidenceStrength::High)
    );
    assert!(!report.decision.ambiguous_tie);
    assert!(!report.validation_skipped);
    assert!(report.verdict.as_ref().unwrap().accepted);
    assert_eq!(report.ranking.len(), 5);
    assert_eq!(report.ranking[0].species, "Tulsi");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let narration = decision_narration(&report.decision, MetadataTable::reference()).unwrap();
    assert!(narration.starts_with("Tulsi. Scientific name: Ocimum tenuiflorum."));
}

#[test]
fn test_rejected_photo_never_reaches_the_model() {
    let (identifier, calls) = identifier(vec![("Neem", 0.9)]);

    let outcome = identifier.identify(&solid(30, 200, [50, 140, 40]), false).unwrap();
    match outcome {
        Identification::Rejected(verdict) => {
            assert!(!verdict.accepted);
            assert!(matches!(
                verdict.rejection,
                Some(RejectionReason::TooSmall { .. })
            ));
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    let outcome = identifier.identify(&solid(200, 200, [200, 150, 130]), false).unwrap();
    assert!(matches!(outcome, Identification::Rejected(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_skip_validation_classifies_anything() {
    let (identifier, calls) = identifier(vec![("Neem", 0.9)]);
    let outcome = identifier
        .identify(&solid(200, 200, [200, 150, 130]), true)
        .unwrap();
    let report = outcome.report().unwrap();
    assert!(report.validation_skipped);
    assert!(report.verdict.is_none());
    assert_eq!(report.decision.predicted_species, "Neem");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_out_of_catalog_leaf_is_unknown_but_ranked() {
    let (identifier, _) = identifier(vec![("Mint", 0.40), ("Mexican_Mint", 0.35)]);
    let outcome = identifier.identify(&leaf(), false).unwrap();
    let report = outcome.report().unwrap();

    assert_eq!(report.decision.tier, ConfidenceTier::Unknown);
    assert!(!report.decision.ambiguous_tie);
    assert!(!report.is_reliable());
    assert_eq!(report.ranking[0].species, "Mint");
    assert_eq!(report.ranking[1].species, "Mexican_Mint");
    assert!(decision_narration(&report.decision, MetadataTable::reference()).is_none());
}

#[test]
fn test_near_tie_names_the_runner_up() {
    // With normalized output a tie needs a floor below 55: a top of at least
    // 60 leaves at most 40 for the runner-up.
    let (identifier, _) = identifier(vec![("Jasmine", 0.62), ("Parijata", 0.36)]);
    let report = identifier.identify(&leaf(), false).unwrap();
    assert!(!report.report().unwrap().decision.ambiguous_tie);

    let mut config = LeafIdConfig::default();
    config.decision.unknown_threshold = 40.0;
    let (identifier, _) =
        identifier_with(&config, vec![("Jasmine", 0.48), ("Parijata", 0.42)]);
    let report = identifier.identify(&leaf(), false).unwrap();
    let decision = &report.report().unwrap().decision;
    assert_eq!(decision.tier, ConfidenceTier::Moderate);
    assert!(decision.ambiguous_tie);
    assert_eq!(decision.runner_up_species.as_deref(), Some("Parijata"));
    assert!(decision.ambiguity_note().unwrap().contains("Parijata"));
}

#[test]
fn test_unavailable_model_fails_every_request() {
    let classifier = SpeciesClassifier::unavailable("weights missing", catalog());
    let identifier = LeafIdentifier::from_config(&LeafIdConfig::default(), classifier);

    for _ in 0..3 {
        let err = identifier.identify(&leaf(), false).unwrap_err();
        assert_eq!(err, LeafError::ModelUnavailable("weights missing".to_string()));
        assert!(err.is_fatal());
    }

    // The gate still answers without a model
    assert!(identifier
        .identify(&solid(10, 10, [0, 0, 0]), false)
        .unwrap()
        .report()
        .is_none());
}

#[test]
fn test_already_normalized_tensor_is_not_rescaled() {
    let (identifier, _) = identifier(vec![("Guava", 0.8)]);

    let unit = Tensor::from_elem((1, 224, 224, 3), 0.5);
    let report = identifier.identify_tensor(unit).unwrap();
    assert_eq!(report.decision.predicted_species, "Guava");

    let bytes = Tensor::from_elem((1, 224, 224, 3), 128.0);
    assert!(identifier.identify_tensor(bytes).is_ok());

    let wrong = Tensor::from_elem((1, 100, 100, 3), 0.5);
    assert!(matches!(
        identifier.identify_tensor(wrong),
        Err(LeafError::Configuration(_))
    ));
}

#[test]
fn test_every_catalog_species_has_metadata() {
    let store = MetadataTable::reference();
    for species in catalog().iter() {
        assert!(store.lookup(species).is_ok(), "{species}");
    }
}

#[test]
fn test_report_serializes_with_outcome_tag() {
    let (identifier, _) = identifier(vec![("Betel", 0.97)]);
    let outcome = identifier.identify(&leaf(), false).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "classified");
    assert_eq!(json["decision"]["predicted_species"], "Betel");
    assert_eq!(json["decision"]["tier"]["tier"], "confident");
    assert_eq!(json["decision"]["tier"]["strength"], "high");

    let rejected = identifier.identify(&solid(20, 20, [0, 200, 0]), false).unwrap();
    let json = serde_json::to_value(&rejected).unwrap();
    assert_eq!(json["outcome"], "rejected");
    assert_eq!(json["rejection"]["check"], "too_small");
}
