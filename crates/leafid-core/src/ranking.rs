//! Top-K ranking for display.

use serde::Serialize;

use crate::catalog::SpeciesCatalog;
use crate::decision::ProbabilityVector;
use crate::error::Result;

/// Default number of ranked predictions shown alongside a decision.
pub const DEFAULT_TOP_K: usize = 5;

/// One row of a ranked prediction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSpecies {
    pub species: String,
    /// Percent, 0-100.
    pub confidence: f32,
}

/// The `k` most probable species, highest first.
///
/// Equal probabilities keep catalog (lexicographic) order. `k` larger than
/// the catalog returns the whole catalog ranked.
pub fn top_k(
    probabilities: &ProbabilityVector,
    catalog: &SpeciesCatalog,
    k: usize,
) -> Result<Vec<RankedSpecies>> {
    catalog.check_len(probabilities.len())?;

    let values = probabilities.as_slice();
    Ok(probabilities
        .ranked_indices()
        .into_iter()
        .take(k.min(catalog.len()))
        .map(|i| RankedSpecies {
            species: catalog[i].to_string(),
            confidence: values[i] * 100.0,
        })
        .collect())
}
