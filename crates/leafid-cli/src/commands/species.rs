use serde::Serialize;

use leafid_cli::render_species;
use leafid_core::metadata::{MetadataTable, SpeciesInfo, SpeciesMetadataStore};

#[derive(Serialize)]
struct SpeciesEntry<'a> {
    index: usize,
    id: &'a str,
    #[serde(flatten)]
    info: &'a SpeciesInfo,
}

/// List the reference catalog in index order.
pub fn cmd_species_list(json: bool) -> Result<(), String> {
    let table = MetadataTable::reference();
    let catalog = table.catalog().map_err(|e| e.to_string())?;

    let entries: Vec<SpeciesEntry> = catalog
        .iter()
        .enumerate()
        .map(|(index, id)| {
            table
                .lookup(id)
                .map(|info| SpeciesEntry { index, id, info })
                .map_err(|e| e.to_string())
        })
        .collect::<Result<_, _>>()?;

    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to serialize species: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "Catalog {} ({} species):",
        catalog.version(),
        catalog.len()
    );
    for entry in &entries {
        println!(
            "  {:>2}. {:<26} {}",
            entry.index,
            entry.id,
            entry.info.scientific_name
        );
    }
    Ok(())
}

/// Show one species by identifier or common name.
pub fn cmd_species_show(name: String, json: bool) -> Result<(), String> {
    let table = MetadataTable::reference();
    let id = table
        .find(&name)
        .ok_or_else(|| format!("No species matches '{}'", name))?;
    let info = table.lookup(id).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(info)
            .map_err(|e| format!("Failed to serialize species: {}", e))?;
        println!("{}", out);
    } else {
        println!("{}", render_species(id, info));
    }
    Ok(())
}
