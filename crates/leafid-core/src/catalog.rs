//! Species catalog
//!
//! The fixed, ordered list of species identifiers the classifier was trained
//! on. Position `i` of every probability vector refers to `catalog[i]`, so the
//! catalog is built once at startup, sorted lexicographically, and shared by
//! reference. Nothing else re-derives the order.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::error::{LeafError, Result};

/// Ordered, versioned set of species identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesCatalog {
    version: String,
    species: Vec<String>,
}

impl SpeciesCatalog {
    /// Build a catalog from identifiers in any order.
    ///
    /// Identifiers are trimmed and sorted by byte order. Empty catalogs,
    /// blank identifiers and duplicates are configuration errors.
    pub fn new<I, S>(version: impl Into<String>, species: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        for id in species {
            let id = id.as_ref().trim();
            if id.is_empty() {
                return Err(LeafError::Configuration(
                    "species catalog contains a blank identifier".to_string(),
                ));
            }
            if !seen.insert(id.to_string()) {
                return Err(LeafError::Configuration(format!(
                    "species catalog lists '{}' more than once",
                    id
                )));
            }
        }

        if seen.is_empty() {
            return Err(LeafError::Configuration(
                "species catalog is empty".to_string(),
            ));
        }

        Ok(Self {
            version: version.into(),
            species: seen.into_iter().collect(),
        })
    }

    /// Parse a labels file: one identifier per line, blank lines ignored.
    pub fn from_labels(version: impl Into<String>, labels: &str) -> Result<Self> {
        Self::new(
            version,
            labels.lines().map(str::trim).filter(|l| !l.is_empty()),
        )
    }

    /// Load a labels file from disk. The file stem becomes the version.
    pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LeafError::Configuration(format!(
                "failed to read labels file {}: {}",
                path.display(),
                e
            ))
        })?;
        let version = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "labels".to_string());
        Self::from_labels(version, &contents)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Identifier at position `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.species.get(index).map(String::as_str)
    }

    /// Position of `species`, if it is in the catalog.
    pub fn index_of(&self, species: &str) -> Option<usize> {
        self.species
            .binary_search_by(|probe| probe.as_str().cmp(species))
            .ok()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.index_of(species).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.species.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.species
    }

    /// Fail unless a model output of `len` entries lines up with the catalog.
    pub fn check_len(&self, len: usize) -> Result<()> {
        if len == self.species.len() {
            Ok(())
        } else {
            Err(LeafError::Configuration(format!(
                "probability vector has {} entries but catalog '{}' has {} species",
                len,
                self.version,
                self.species.len()
            )))
        }
    }
}

impl std::ops::Index<usize> for SpeciesCatalog {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.species[index]
    }
}
