//! ONNX backend on tract.

use std::path::{Path, PathBuf};

use tract_onnx::prelude::*;

use crate::error::{LeafError, Result};
use crate::normalize::InputShape;

use super::SpeciesModel;

/// An ONNX image classifier taking `(1, height, width, 3)` float input.
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    shape: InputShape,
    path: PathBuf,
}

impl OnnxModel {
    /// Load and optimize the model with a fixed input shape.
    pub fn load(path: &Path, shape: InputShape) -> Result<Self> {
        if !path.exists() {
            return Err(LeafError::ModelUnavailable(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let (batch, height, width, channels) = shape.dims();
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(0, f32::fact([batch, height, width, channels]).into())
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                LeafError::ModelUnavailable(format!("failed to load {}: {}", path.display(), e))
            })?;

        Ok(Self {
            plan,
            shape,
            path: path.to_path_buf(),
        })
    }
}

impl SpeciesModel for OnnxModel {
    fn infer(&mut self, input: &crate::normalize::Tensor) -> Result<Vec<f32>> {
        let expected = self.shape.dims();
        if input.dim() != expected {
            return Err(LeafError::Configuration(format!(
                "input tensor has shape {:?}, model expects {:?}",
                input.dim(),
                expected
            )));
        }

        let (batch, height, width, channels) = expected;
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(&[batch, height, width, channels], &data)
            .map_err(|e| LeafError::InferenceFailed(format!("failed to build input: {}", e)))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| LeafError::InferenceFailed(format!("model run failed: {}", e)))?;

        let first = outputs
            .first()
            .ok_or_else(|| LeafError::InferenceFailed("model produced no outputs".to_string()))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| LeafError::InferenceFailed(format!("unexpected output type: {}", e)))?;

        Ok(view.iter().copied().collect())
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.path.display())
    }
}
