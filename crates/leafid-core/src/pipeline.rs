//! Identification pipeline.
//!
//! Wires the stages in order: leaf gate (may short-circuit), normalizer,
//! classifier, decision engine and top-K ranking. The caller decides whether
//! the gate runs through an explicit `skip_validation` flag.

use std::sync::Arc;

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::SpeciesCatalog;
use crate::classifier::SpeciesClassifier;
use crate::config::LeafIdConfig;
use crate::decision::{ClassificationDecision, ConfidenceDecisionEngine, ProbabilityVector};
use crate::error::Result;
use crate::gate::{LeafPlausibilityGate, LeafVerdict};
use crate::normalize::{ImageNormalizer, Tensor};
use crate::ranking::{self, RankedSpecies};

/// Outcome of one identification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Identification {
    /// The gate refused the photo; no inference was run.
    Rejected(LeafVerdict),
    Classified(IdentificationReport),
}

impl Identification {
    pub fn report(&self) -> Option<&IdentificationReport> {
        match self {
            Identification::Classified(report) => Some(report),
            Identification::Rejected(_) => None,
        }
    }
}

/// Everything presentation needs for a classified photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentificationReport {
    pub decision: ClassificationDecision,
    /// Highest first. Unreliable when the decision tier is unknown.
    pub ranking: Vec<RankedSpecies>,
    /// Absent when validation was skipped or the input was a tensor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<LeafVerdict>,
    pub validation_skipped: bool,
}

impl IdentificationReport {
    pub fn is_reliable(&self) -> bool {
        self.decision.is_reliable()
    }
}

/// Entry point for identifying a leaf photo.
#[derive(Debug)]
pub struct LeafIdentifier {
    gate: LeafPlausibilityGate,
    normalizer: ImageNormalizer,
    classifier: SpeciesClassifier,
    engine: ConfidenceDecisionEngine,
    top_k: usize,
}

impl LeafIdentifier {
    pub fn new(
        gate: LeafPlausibilityGate,
        normalizer: ImageNormalizer,
        classifier: SpeciesClassifier,
        engine: ConfidenceDecisionEngine,
        top_k: usize,
    ) -> Self {
        Self {
            gate,
            normalizer,
            classifier,
            engine,
            top_k,
        }
    }

    /// Build every stage from configuration around an already-loaded classifier.
    pub fn from_config(config: &LeafIdConfig, classifier: SpeciesClassifier) -> Self {
        Self::new(
            LeafPlausibilityGate::new(config.gate.clone()),
            config.model.normalizer(),
            classifier,
            ConfidenceDecisionEngine::new(config.decision.clone()),
            config.ranking.top_k,
        )
    }

    pub fn catalog(&self) -> &Arc<SpeciesCatalog> {
        self.classifier.catalog()
    }

    pub fn classifier(&self) -> &SpeciesClassifier {
        &self.classifier
    }

    pub fn gate(&self) -> &LeafPlausibilityGate {
        &self.gate
    }

    /// Run only the leaf gate.
    pub fn check(&self, image: &DynamicImage) -> LeafVerdict {
        self.gate.evaluate(image)
    }

    /// Identify the species in a decoded photo.
    ///
    /// Rejections and low confidence are returned as data. Errors are
    /// infrastructure failures only.
    pub fn identify(&self, image: &DynamicImage, skip_validation: bool) -> Result<Identification> {
        let verdict = if skip_validation {
            warn!("Leaf validation skipped at caller's request");
            None
        } else {
            let verdict = self.gate.evaluate(image);
            if !verdict.accepted {
                warn!(
                    check = verdict.rejection.map(|r| r.check_name()),
                    "Image rejected: {}",
                    verdict.reason
                );
                return Ok(Identification::Rejected(verdict));
            }
            Some(verdict)
        };

        let tensor = self.normalizer.normalize(image);
        debug!(shape = ?tensor.dim(), "Normalized input");

        let mut report = self.classify_normalized(&tensor)?;
        report.verdict = verdict;
        report.validation_skipped = skip_validation;
        Ok(Identification::Classified(report))
    }

    /// Identify from a tensor that is already in classifier layout.
    ///
    /// 0-255 data is rescaled once; 0-1 data is used as is.
    pub fn identify_tensor(&self, tensor: Tensor) -> Result<IdentificationReport> {
        let tensor = self.normalizer.conform(tensor)?;
        self.classify_normalized(&tensor)
    }

    fn classify_normalized(&self, tensor: &Tensor) -> Result<IdentificationReport> {
        let probabilities = self.classifier.classify(tensor)?;
        self.report_for(&probabilities)
    }

    /// Decision and ranking for an already-validated probability vector.
    pub fn report_for(&self, probabilities: &ProbabilityVector) -> Result<IdentificationReport> {
        let catalog = self.classifier.catalog();
        let decision = self.engine.decide_vector(probabilities, catalog)?;
        let ranking = ranking::top_k(probabilities, catalog, self.top_k)?;

        info!(
            species = %decision.predicted_species,
            confidence = decision.confidence,
            tier = ?decision.tier,
            ambiguous = decision.ambiguous_tie,
            "Identified leaf"
        );

        Ok(IdentificationReport {
            decision,
            ranking,
            verdict: None,
            validation_skipped: true,
        })
    }
}
