//! Plain-text rendering of gate verdicts, identification reports and species facts.

use std::fmt::Write;

use leafid_core::metadata::{SpeciesInfo, SpeciesMetadataStore};
use leafid_core::{IdentificationReport, LeafVerdict};

/// One-line verdict, with the average color when it was measured.
pub fn render_verdict(verdict: &LeafVerdict) -> String {
    let mut out = if verdict.accepted {
        format!("OK        {}", verdict.reason)
    } else {
        format!("REJECTED  {}", verdict.reason)
    };
    if let Some(profile) = &verdict.profile {
        let _ = write!(
            out,
            " [avg RGB {:.0}/{:.0}/{:.0}]",
            profile.red, profile.green, profile.blue
        );
    }
    out
}

/// Multi-line report. Plant details are shown only for reliable decisions.
pub fn render_report(report: &IdentificationReport, store: &dyn SpeciesMetadataStore) -> String {
    let decision = &report.decision;
    let mut out = String::new();

    let name = decision.predicted_species.replace('_', " ");
    if decision.is_reliable() {
        let _ = writeln!(out, "Prediction: {} ({:.2}%)", name, decision.confidence);
    } else {
        let _ = writeln!(
            out,
            "Best guess (unreliable): {} ({:.2}%)",
            name, decision.confidence
        );
    }
    let _ = writeln!(out, "{}", decision.tier.headline());
    if let Some(note) = decision.ambiguity_note() {
        let _ = writeln!(out, "Note: {}", note);
    }
    if report.validation_skipped && report.verdict.is_none() {
        let _ = writeln!(out, "Leaf validation was skipped.");
    }

    let heading = if decision.is_reliable() {
        format!("Top {}:", report.ranking.len())
    } else {
        format!("Top {} (unreliable):", report.ranking.len())
    };
    let _ = writeln!(out, "{}", heading);
    for (i, entry) in report.ranking.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<26} {:>6.2}%",
            i + 1,
            entry.species.replace('_', " "),
            entry.confidence
        );
    }

    if decision.is_reliable() {
        if let Ok(info) = store.lookup(&decision.predicted_species) {
            out.push('\n');
            out.push_str(&render_species(&decision.predicted_species, info));
        }
    }

    out.trim_end().to_string()
}

/// Full botanical entry for one species.
pub fn render_species(species: &str, info: &SpeciesInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", species.replace('_', " "));
    let _ = writeln!(out, "  Scientific name: {}", info.scientific_name);
    let _ = writeln!(out, "  Family:          {}", info.family);
    let _ = writeln!(out, "  Common names:    {}", info.common_names);
    let _ = writeln!(out, "  Description:     {}", info.description);
    let _ = writeln!(out, "  Medicinal uses:");
    for use_ in info.use_list() {
        let _ = writeln!(out, "    - {}", use_);
    }
    let _ = writeln!(out, "  Parts used:      {}", info.parts_used);
    let _ = writeln!(out, "  Preparation:     {}", info.preparation);
    let _ = write!(out, "  Precautions:     {}", info.precautions);
    out
}
