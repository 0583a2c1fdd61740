//! Error taxonomy for the identification pipeline.
//!
//! Only infrastructure failures live here. A rejected photo
//! ([`crate::gate::LeafVerdict`]) and a low-confidence result
//! ([`crate::decision::ConfidenceTier::Unknown`]) are ordinary return values.

use thiserror::Error;

/// Errors raised by the identification pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeafError {
    /// Catalog and model disagree, or a tensor has the wrong shape.
    /// Halts startup or the current request; retrying cannot help.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The model could not be loaded. Latched for the life of the process.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A single input could not be scored. The caller may retry with another image.
    #[error("inference failed: {0}")]
    InferenceFailed(String),

    /// The input bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// No metadata entry exists for the species identifier.
    #[error("species not found: {0}")]
    SpeciesNotFound(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl LeafError {
    /// Whether this failure should stop all further classification.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LeafError::Configuration(_) | LeafError::ModelUnavailable(_)
        )
    }

    /// Whether the caller may try again with a different image.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeafError::InferenceFailed(_) | LeafError::Decode(_))
    }
}

impl From<std::io::Error> for LeafError {
    fn from(err: std::io::Error) -> Self {
        LeafError::Io(err.to_string())
    }
}

pub type Result<T, E = LeafError> = std::result::Result<T, E>;
