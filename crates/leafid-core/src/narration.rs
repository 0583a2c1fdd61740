//! Spoken plant descriptions.
//!
//! Builds the text read aloud for an identified plant and hands it to a
//! [`SpeechSynthesizer`]. Synthesis is a side effect: failures are logged and
//! never reach the identification result.

use tracing::{debug, warn};

use crate::decision::ClassificationDecision;
use crate::error::Result;
use crate::metadata::{SpeciesInfo, SpeciesMetadataStore};

/// Converts text into playable audio.
pub trait SpeechSynthesizer {
    type Audio;

    fn synthesize(&self, text: &str) -> Result<Self::Audio>;
}

/// Description text for one species.
pub fn narration_text(species: &str, info: &SpeciesInfo) -> String {
    format!(
        "{}. Scientific name: {}. Common names include: {}. {} The medicinal uses include: {}. Parts commonly used are: {}.",
        species.replace('_', " "),
        info.scientific_name,
        info.common_names,
        info.description,
        info.uses,
        info.parts_used
    )
}

/// Narration for a decision, if it is reliable and has metadata.
pub fn decision_narration(
    decision: &ClassificationDecision,
    store: &dyn SpeciesMetadataStore,
) -> Option<String> {
    if !decision.is_reliable() {
        return None;
    }
    match store.lookup(&decision.predicted_species) {
        Ok(info) => Some(narration_text(&decision.predicted_species, info)),
        Err(e) => {
            debug!("No narration: {}", e);
            None
        }
    }
}

/// Fire-and-forget synthesis. Returns the audio when it worked.
pub fn narrate<S: SpeechSynthesizer>(synthesizer: &S, text: &str) -> Option<S::Audio> {
    match synthesizer.synthesize(text) {
        Ok(audio) => Some(audio),
        Err(e) => {
            warn!("Speech synthesis failed: {}", e);
            None
        }
    }
}
