//! Validated classifier output.

use serde::Serialize;

use crate::error::{LeafError, Result};

/// Allowed deviation of a probability vector's sum from 1.0.
pub const PROBABILITY_SUM_EPSILON: f32 = 1e-3;

/// Per-species scores in catalog order.
///
/// Every entry is finite and non-negative and at least one is positive, so
/// an arg-max always means something.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    /// Validate raw scores.
    ///
    /// An empty vector is a configuration error. NaN, infinite, negative or
    /// all-zero vectors mean the model failed on this input.
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            return Err(LeafError::Configuration(
                "probability vector is empty".to_string(),
            ));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(LeafError::InferenceFailed(format!(
                "probability vector has a non-finite value at index {}",
                i
            )));
        }
        if let Some(i) = values.iter().position(|&v| v < 0.0) {
            return Err(LeafError::InferenceFailed(format!(
                "probability vector has a negative value at index {}",
                i
            )));
        }
        if values.iter().all(|&v| v == 0.0) {
            return Err(LeafError::InferenceFailed(
                "probability vector is all zeros".to_string(),
            ));
        }
        Ok(Self(values))
    }

    /// Validate scores that must also sum to 1.0 within `epsilon`.
    pub fn normalized(values: Vec<f32>, epsilon: f32) -> Result<Self> {
        let vector = Self::new(values)?;
        let sum = vector.sum();
        if (sum - 1.0).abs() > epsilon {
            return Err(LeafError::InferenceFailed(format!(
                "probabilities sum to {:.6}, expected 1.0",
                sum
            )));
        }
        Ok(vector)
    }

    /// Apply a numerically stable softmax to raw logits.
    pub fn from_logits(logits: &[f32]) -> Result<Self> {
        if logits.is_empty() {
            return Err(LeafError::Configuration("logit vector is empty".to_string()));
        }
        if logits.iter().any(|v| !v.is_finite()) {
            return Err(LeafError::InferenceFailed(
                "logit vector has non-finite values".to_string(),
            ));
        }

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f64> = logits.iter().map(|&v| ((v - max) as f64).exp()).collect();
        let total: f64 = exps.iter().sum();
        Self::new(exps.iter().map(|&e| (e / total) as f32).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().map(|&v| v as f64).sum::<f64>() as f32
    }

    /// Indices ordered by descending probability; equal values keep catalog order.
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.0.len()).collect();
        // Stable sort: ties stay in ascending index order
        indices.sort_by(|&a, &b| {
            self.0[b]
                .partial_cmp(&self.0[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
    }
}
