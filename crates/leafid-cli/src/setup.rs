//! Pipeline construction from configuration and command-line overrides.

use std::path::PathBuf;
use std::sync::Arc;

use leafid_core::metadata::MetadataTable;
use leafid_core::{
    LeafIdConfig, LeafIdentifier, LeafPolicy, ModelConfig, SpeciesCatalog, SpeciesClassifier,
};
use tracing::info;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<PathBuf>,
    pub labels: Option<PathBuf>,
    pub top: Option<usize>,
    pub policy: Option<String>,
    pub unknown_threshold: Option<f32>,
}

/// Fold overrides into a loaded configuration.
pub fn apply_overrides(config: &mut LeafIdConfig, overrides: &Overrides) -> Result<(), String> {
    if let Some(model) = &overrides.model {
        config.model.path = model.clone();
    }
    if let Some(labels) = &overrides.labels {
        config.model.labels = Some(labels.clone());
    }
    if let Some(top) = overrides.top {
        config.ranking.top_k = top.max(1);
    }
    if let Some(name) = &overrides.policy {
        config.gate = LeafPolicy::named(name).ok_or_else(|| {
            format!(
                "Unknown gate policy '{}' (expected standard, lenient or strict)",
                name
            )
        })?;
    }
    if let Some(threshold) = overrides.unknown_threshold {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(format!(
                "Unknown threshold must be between 0 and 100, got {}",
                threshold
            ));
        }
        config.decision.unknown_threshold = threshold;
        config.decision.good_threshold = config.decision.good_threshold.max(threshold);
        config.decision.high_threshold = config
            .decision
            .high_threshold
            .max(config.decision.good_threshold);
    }
    Ok(())
}

/// The catalog the model was trained on: a labels file, or the embedded table.
pub fn load_catalog(model: &ModelConfig) -> Result<Arc<SpeciesCatalog>, String> {
    let catalog = match &model.labels {
        Some(path) => SpeciesCatalog::load_labels(path),
        None => MetadataTable::reference().catalog(),
    }
    .map_err(|e| e.to_string())?;

    info!(
        version = catalog.version(),
        species = catalog.len(),
        "Species catalog ready"
    );
    Ok(Arc::new(catalog))
}

/// Load the model once and assemble the pipeline. Fails when the model is unavailable.
pub fn build_identifier(config: &LeafIdConfig) -> Result<LeafIdentifier, String> {
    let catalog = load_catalog(&config.model)?;
    let classifier = SpeciesClassifier::load(&config.model, catalog);
    classifier.ensure_available().map_err(|e| e.to_string())?;
    Ok(LeafIdentifier::from_config(config, classifier))
}
