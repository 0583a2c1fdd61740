//! Species classifier adapter
//!
//! Wraps an opaque model behind [`SpeciesModel`] and turns its raw output into
//! a validated [`ProbabilityVector`] in catalog order. Loading happens once; a
//! load failure is latched and every later `classify` call returns the same
//! [`LeafError::ModelUnavailable`] without touching the model again.

#[cfg(feature = "onnx")]
mod onnx;


#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::catalog::SpeciesCatalog;
use crate::decision::{ProbabilityVector, PROBABILITY_SUM_EPSILON};
use crate::error::{LeafError, Result};
use crate::normalize::{ImageNormalizer, InputShape, ResizeFilter, Tensor, DEFAULT_INPUT_SIZE};

/// Default model file, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/leaf_classifier.onnx";

/// A loaded model mapping one input tensor to per-species scores.
///
/// Implementations need not be thread-safe; the adapter holds the model
/// behind a mutex for the duration of each call.
pub trait SpeciesModel: Send {
    fn infer(&mut self, input: &Tensor) -> Result<Vec<f32>>;

    /// Short label for logs.
    fn describe(&self) -> String {
        "species model".to_string()
    }
}

/// What the model's output layer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Softmax already applied; must sum to 1.0.
    #[default]
    Probabilities,
    /// Raw scores; softmax is applied here.
    Logits,
}

/// Model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Labels file defining the catalog. Uses the embedded species table when unset.
    pub labels: Option<PathBuf>,
    pub input_width: u32,
    pub input_height: u32,
    pub resize_filter: ResizeFilter,
    pub output: OutputKind,
    /// Allowed deviation from 1.0 when `output` is `probabilities`.
    pub sum_epsilon: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels: None,
            input_width: DEFAULT_INPUT_SIZE,
            input_height: DEFAULT_INPUT_SIZE,
            resize_filter: ResizeFilter::default(),
            output: OutputKind::default(),
            sum_epsilon: PROBABILITY_SUM_EPSILON,
        }
    }
}

impl ModelConfig {
    pub fn input_shape(&self) -> InputShape {
        InputShape {
            width: self.input_width,
            height: self.input_height,
        }
    }

    /// Normalizer producing tensors this model accepts.
    pub fn normalizer(&self) -> ImageNormalizer {
        ImageNormalizer::new(self.input_shape(), self.resize_filter)
    }

    pub(crate) fn sanitize(&mut self) {
        self.input_width = self.input_width.clamp(1, 4096);
        self.input_height = self.input_height.clamp(1, 4096);
        if !self.sum_epsilon.is_finite() {
            self.sum_epsilon = PROBABILITY_SUM_EPSILON;
        }
        self.sum_epsilon = self.sum_epsilon.clamp(1e-6, 0.5);
    }
}

enum ModelState {
    Ready(Mutex<Box<dyn SpeciesModel>>),
    Unavailable(String),
}

/// Adapter between the pipeline and a loaded model.
pub struct SpeciesClassifier {
    state: ModelState,
    catalog: Arc<SpeciesCatalog>,
    output: OutputKind,
    sum_epsilon: f32,
}

impl std::fmt::Debug for SpeciesClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeciesClassifier")
            .field("available", &self.is_available())
            .field("catalog", &self.catalog.version())
            .field("output", &self.output)
            .finish()
    }
}

impl SpeciesClassifier {
    /// Wrap an already-loaded model.
    pub fn from_model(
        model: Box<dyn SpeciesModel>,
        catalog: Arc<SpeciesCatalog>,
        output: OutputKind,
    ) -> Self {
        info!(
            model = %model.describe(),
            catalog = catalog.version(),
            species = catalog.len(),
            "Species model ready"
        );
        Self {
            state: ModelState::Ready(Mutex::new(model)),
            catalog,
            output,
            sum_epsilon: PROBABILITY_SUM_EPSILON,
        }
    }

    /// A classifier whose model failed to load.
    pub fn unavailable(reason: impl Into<String>, catalog: Arc<SpeciesCatalog>) -> Self {
        let reason = reason.into();
        error!("Species model unavailable: {}", reason);
        Self {
            state: ModelState::Unavailable(reason),
            catalog,
            output: OutputKind::default(),
            sum_epsilon: PROBABILITY_SUM_EPSILON,
        }
    }

    /// Load the configured model once. Failure is latched, not returned.
    pub fn load(config: &ModelConfig, catalog: Arc<SpeciesCatalog>) -> Self {
        match Self::open_model(config) {
            Ok(model) => Self::from_model(model, catalog, config.output)
                .with_sum_epsilon(config.sum_epsilon),
            Err(LeafError::ModelUnavailable(reason)) => Self::unavailable(reason, catalog),
            Err(e) => Self::unavailable(e.to_string(), catalog),
        }
    }

    #[cfg(feature = "onnx")]
    fn open_model(config: &ModelConfig) -> Result<Box<dyn SpeciesModel>> {
        Ok(Box::new(OnnxModel::load(&config.path, config.input_shape())?))
    }

    #[cfg(not(feature = "onnx"))]
    fn open_model(config: &ModelConfig) -> Result<Box<dyn SpeciesModel>> {
        Err(LeafError::ModelUnavailable(format!(
            "{}: built without ONNX support",
            config.path.display()
        )))
    }

    pub fn with_sum_epsilon(mut self, epsilon: f32) -> Self {
        self.sum_epsilon = epsilon;
        self
    }

    pub fn catalog(&self) -> &Arc<SpeciesCatalog> {
        &self.catalog
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// Fail fast at startup when the model did not load.
    pub fn ensure_available(&self) -> Result<()> {
        match &self.state {
            ModelState::Ready(_) => Ok(()),
            ModelState::Unavailable(reason) => Err(LeafError::ModelUnavailable(reason.clone())),
        }
    }

    /// Score one normalized tensor.
    pub fn classify(&self, tensor: &Tensor) -> Result<ProbabilityVector> {
        let model = match &self.state {
            ModelState::Ready(model) => model,
            ModelState::Unavailable(reason) => {
                return Err(LeafError::ModelUnavailable(reason.clone()));
            }
        };

        let raw = {
            let mut guard = model.lock().map_err(|_| {
                LeafError::ModelUnavailable("model lock poisoned by an earlier panic".to_string())
            })?;
            guard.infer(tensor)?
        };

        self.catalog.check_len(raw.len())?;

        let vector = match self.output {
            OutputKind::Probabilities => ProbabilityVector::normalized(raw, self.sum_epsilon)?,
            OutputKind::Logits => ProbabilityVector::from_logits(&raw)?,
        };

        debug!(
            top = ?vector
                .ranked_indices()
                .iter()
                .take(3)
                .map(|&i| (&self.catalog[i], vector.as_slice()[i]))
                .collect::<Vec<_>>(),
            "Raw classifier output"
        );

        Ok(vector)
    }
}
