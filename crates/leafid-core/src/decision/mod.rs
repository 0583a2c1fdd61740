//! Confidence decision engine
//!
//! Turns a probability vector into a [`ClassificationDecision`]: the arg-max
//! species, a confidence tier from ordered thresholds, and an independent
//! ambiguity flag when the runner-up is within the tie margin.
//!
//! A fixed-catalog classifier always produces some top class, even for a
//! species it has never seen. The unknown floor keeps such guesses from being
//! presented as identifications.

mod policy;
mod probability;

#[cfg(test)]
mod tests;

pub use policy::{
    DecisionPolicy, GOOD_CONFIDENCE_THRESHOLD, HIGH_CONFIDENCE_THRESHOLD, TIE_MARGIN,
    UNKNOWN_THRESHOLD,
};
pub use probability::{ProbabilityVector, PROBABILITY_SUM_EPSILON};

use serde::Serialize;
use tracing::debug;

use crate::catalog::SpeciesCatalog;
use crate::error::Result;

/// Message strength of a confident match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceStrength {
    High,
    Good,
}

/// Categorical bucket for the top prediction's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", content = "strength", rename_all = "snake_case")]
pub enum ConfidenceTier {
    Confident(ConfidenceStrength),
    Moderate,
    /// Below the unknown floor: likely out of catalog. The prediction is
    /// only an unreliable guess.
    Unknown,
}

impl ConfidenceTier {
    /// Whether the prediction may be shown as an identification.
    pub fn is_reliable(&self) -> bool {
        !matches!(self, ConfidenceTier::Unknown)
    }

    /// User-facing message for this tier.
    pub fn headline(&self) -> &'static str {
        match self {
            ConfidenceTier::Confident(ConfidenceStrength::High) => {
                "High confidence prediction! The model is very certain about this identification."
            }
            ConfidenceTier::Confident(ConfidenceStrength::Good) => {
                "Good confidence! This prediction is reliable."
            }
            ConfidenceTier::Moderate => {
                "Moderate confidence. The prediction might be correct, but consider uploading a clearer image for better accuracy."
            }
            ConfidenceTier::Unknown => {
                "Plant not recognized. It is likely not one of the supported species; the best match below is an unreliable guess."
            }
        }
    }
}

/// Outcome of [`ConfidenceDecisionEngine::decide`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationDecision {
    pub predicted_species: String,
    pub predicted_index: usize,
    /// Percent, 0-100.
    pub confidence: f32,
    pub tier: ConfidenceTier,
    /// Top two predictions are too close to trust the top one alone.
    /// Never set for [`ConfidenceTier::Unknown`].
    pub ambiguous_tie: bool,
    /// Absent only for single-species catalogs.
    pub runner_up_species: Option<String>,
    pub runner_up_confidence: Option<f32>,
}

impl ClassificationDecision {
    pub fn is_reliable(&self) -> bool {
        self.tier.is_reliable()
    }

    /// Note naming the runner-up when the match is ambiguous.
    pub fn ambiguity_note(&self) -> Option<String> {
        if !self.ambiguous_tie {
            return None;
        }
        let species = self.runner_up_species.as_deref()?;
        let confidence = self.runner_up_confidence?;
        Some(format!(
            "The model also considered {} ({:.2}%). These plants may have similar leaf characteristics.",
            species, confidence
        ))
    }
}

/// Applies a [`DecisionPolicy`] to classifier output.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceDecisionEngine {
    policy: DecisionPolicy,
}

impl ConfidenceDecisionEngine {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Decide on raw probabilities in catalog order.
    pub fn decide(
        &self,
        probabilities: &[f32],
        catalog: &SpeciesCatalog,
    ) -> Result<ClassificationDecision> {
        catalog.check_len(probabilities.len())?;
        let vector = ProbabilityVector::new(probabilities.to_vec())?;
        self.decide_vector(&vector, catalog)
    }

    /// Decide on an already-validated vector.
    pub fn decide_vector(
        &self,
        vector: &ProbabilityVector,
        catalog: &SpeciesCatalog,
    ) -> Result<ClassificationDecision> {
        catalog.check_len(vector.len())?;

        let ranked = vector.ranked_indices();
        let top = ranked[0];
        let confidence = vector.as_slice()[top] * 100.0;

        let runner_up = ranked
            .get(1)
            .map(|&i| (catalog[i].to_string(), vector.as_slice()[i] * 100.0));

        let tier = self.tier_for(confidence);

        let ambiguous_tie = match &runner_up {
            Some((_, second)) => {
                confidence >= self.policy.unknown_threshold
                    && (confidence - second) < self.policy.tie_margin
            }
            None => false,
        };

        let (runner_up_species, runner_up_confidence) = match runner_up {
            Some((species, conf)) => (Some(species), Some(conf)),
            None => (None, None),
        };

        debug!(
            species = &catalog[top],
            confidence,
            tier = ?tier,
            ambiguous_tie,
            "Classification decision"
        );

        Ok(ClassificationDecision {
            predicted_species: catalog[top].to_string(),
            predicted_index: top,
            confidence,
            tier,
            ambiguous_tie,
            runner_up_species,
            runner_up_confidence,
        })
    }

    /// Tier for a confidence in percent, thresholds evaluated top-down.
    pub fn tier_for(&self, confidence: f32) -> ConfidenceTier {
        let policy = &self.policy;
        if confidence < policy.unknown_threshold {
            ConfidenceTier::Unknown
        } else if confidence > policy.high_threshold {
            ConfidenceTier::Confident(ConfidenceStrength::High)
        } else if confidence > policy.good_threshold {
            ConfidenceTier::Confident(ConfidenceStrength::Good)
        } else {
            ConfidenceTier::Moderate
        }
    }
}
