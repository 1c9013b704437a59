//! Item catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use withdraw_core::{ItemMetadata, StaticItemOracle};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemMetadata>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing ItemCatalog
    ///
    /// # Returns
    ///
    /// Returns an oracle over the catalog entries.
    pub fn load(path: &Path) -> LoadResult<StaticItemOracle> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an item catalog from RON text.
    ///
    /// Duplicate item names are rejected so that contract id lookups stay
    /// unambiguous.
    pub fn parse(content: &str) -> LoadResult<StaticItemOracle> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for meta in &catalog.items {
            if !seen.insert(&meta.item) {
                anyhow::bail!("Duplicate item in catalog: {}", meta.item);
            }
        }

        Ok(StaticItemOracle::new(catalog.items))
    }
}
