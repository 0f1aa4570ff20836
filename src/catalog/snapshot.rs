//! Catalog entry model and immutable sorted snapshots.

use serde::{Deserialize, Serialize};

/// One installable package as reported by the package source.
///
/// Only `name` is required; `version` and any source-specific fields
/// (homepage, star count, …) ride along untouched and are handed back to
/// the host with search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,

    #[serde(default)]
    pub version: String,

    /// Source-specific fields, passed through without interpretation.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// An immutable, case-insensitively name-sorted view of the catalog.
///
/// Built once from whatever the source returned, shared behind `Arc`, and
/// replaced wholesale on refresh. The sort is stable: entries whose names
/// tie case-insensitively keep the order the source returned them in.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    pub fn from_entries(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
