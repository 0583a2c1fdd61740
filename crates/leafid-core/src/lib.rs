//! LeafID Core Library
//!
//! Medicinal-plant leaf identification: leaf plausibility gate, classifier
//! input normalization, confidence decisions and ranked predictions.

pub mod assistant;
pub mod catalog;
pub mod classifier;
pub mod color;
pub mod config;
pub mod decision;
pub mod decode;
pub mod error;
pub mod gate;
pub mod metadata;
pub mod narration;
pub mod normalize;
pub mod pipeline;
pub mod ranking;

// Re-export commonly used types
pub use catalog::SpeciesCatalog;
pub use classifier::{ModelConfig, OutputKind, SpeciesClassifier, SpeciesModel};
pub use color::ColorProfile;
pub use config::{load_config, ConfigHandle, LeafIdConfig};
pub use decision::{
    ClassificationDecision, ConfidenceDecisionEngine, ConfidenceStrength, ConfidenceTier,
    DecisionPolicy, ProbabilityVector,
};
pub use error::{LeafError, Result};
pub use gate::{LeafPlausibilityGate, LeafPolicy, LeafVerdict, RejectionReason};
pub use metadata::{MetadataTable, SpeciesInfo, SpeciesMetadataStore};
pub use normalize::{ImageNormalizer, InputShape, ResizeFilter, Tensor};
pub use pipeline::{Identification, IdentificationReport, LeafIdentifier};
pub use ranking::RankedSpecies;

#[cfg(feature = "onnx")]
pub use classifier::OnnxModel;
