//! Shared utilities for leafid-cli
//!
//! Input expansion, pipeline setup from configuration and text rendering of
//! results.

pub mod input;
pub mod render;
pub mod setup;

// Re-export commonly used items at the crate root for convenience
pub use input::expand_inputs;
pub use render::{render_report, render_species, render_verdict};
pub use setup::{apply_overrides, build_identifier, load_catalog, Overrides};
