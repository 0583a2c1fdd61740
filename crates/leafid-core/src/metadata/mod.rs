//! Species metadata store
//!
//! Botanical facts per species, keyed by catalog identifier. The reference
//! table ships inside the binary; a table with the same layout can be loaded
//! from disk for other catalogs.


use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::SpeciesCatalog;
use crate::error::{LeafError, Result};

/// Version tag of the catalog derived from the embedded table.
pub const REFERENCE_CATALOG_VERSION: &str = "reference-30";

const REFERENCE_TABLE: &str = include_str!("../../data/species.yml");

static REFERENCE: Lazy<MetadataTable> = Lazy::new(|| {
    match MetadataTable::from_yaml_str(REFERENCE_CATALOG_VERSION, REFERENCE_TABLE) {
        Ok(table) => table,
        Err(e) => {
            warn!("Failed to parse embedded species table: {}", e);
            MetadataTable {
                version: REFERENCE_CATALOG_VERSION.to_string(),
                entries: BTreeMap::new(),
            }
        }
    }
});

/// Botanical facts for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub scientific_name: String,
    /// Comma-separated.
    pub common_names: String,
    pub family: String,
    /// Comma-separated list of medicinal uses.
    pub uses: String,
    pub description: String,
    pub parts_used: String,
    pub preparation: String,
    pub precautions: String,
}

impl SpeciesInfo {
    pub fn common_name_list(&self) -> impl Iterator<Item = &str> {
        split_list(&self.common_names)
    }

    pub fn use_list(&self) -> impl Iterator<Item = &str> {
        split_list(&self.uses)
    }
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|p| !p.is_empty())
}

/// Keyed, read-only lookup of species metadata.
pub trait SpeciesMetadataStore: Send + Sync {
    /// Facts for a catalog identifier.
    fn lookup(&self, species: &str) -> Result<&SpeciesInfo>;

    /// All identifiers with metadata, in catalog order.
    fn species(&self) -> Vec<&str>;
}

/// In-memory metadata table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTable {
    version: String,
    entries: BTreeMap<String, SpeciesInfo>,
}

impl MetadataTable {
    /// The embedded 30-species reference table.
    pub fn reference() -> &'static MetadataTable {
        &REFERENCE
    }

    /// Parse a YAML mapping of identifier to [`SpeciesInfo`].
    pub fn from_yaml_str(version: impl Into<String>, yaml: &str) -> Result<Self> {
        let entries: BTreeMap<String, SpeciesInfo> = serde_yaml::from_str(yaml)
            .map_err(|e| LeafError::Configuration(format!("invalid species table: {}", e)))?;
        Ok(Self {
            version: version.into(),
            entries,
        })
    }

    /// Load a table from disk. The file stem becomes the version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            LeafError::Configuration(format!(
                "failed to read species table {}: {}",
                path.display(),
                e
            ))
        })?;
        let version = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "species".to_string());
        Self::from_yaml_str(version, &yaml)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpeciesInfo)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Catalog made from this table's identifiers.
    pub fn catalog(&self) -> Result<SpeciesCatalog> {
        SpeciesCatalog::new(self.version.clone(), self.entries.keys())
    }

    /// Resolve free text to an identifier.
    ///
    /// Matches the identifier (case-insensitive, `_` and `-` read as spaces)
    /// or any of the common names.
    pub fn find(&self, name: &str) -> Option<&str> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(id, info)| {
                normalize_name(id) == wanted
                    || info.common_name_list().any(|c| normalize_name(c) == wanted)
            })
            .map(|(id, _)| id.as_str())
    }
}

impl SpeciesMetadataStore for MetadataTable {
    fn lookup(&self, species: &str) -> Result<&SpeciesInfo> {
        self.entries
            .get(species)
            .ok_or_else(|| LeafError::SpeciesNotFound(species.to_string()))
    }

    fn species(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
