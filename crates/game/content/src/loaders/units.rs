//! Species catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::UnitTraits;

use crate::loaders::{LoadResult, read_ron};

/// Species catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub units: Vec<UnitTraits>,
}

/// Loader for species (starters, wild familiars and monsters alike).
pub struct UnitLoader;

impl UnitLoader {
    /// Load every species from a RON file containing a [`UnitCatalog`].
    pub fn load(path: &Path) -> LoadResult<Vec<UnitTraits>> {
        let catalog: UnitCatalog = read_ron(path, "unit catalog")?;
        Ok(catalog.units)
    }

    /// Parse a catalog from RON text.
    pub fn parse(source: &str) -> LoadResult<Vec<UnitTraits>> {
        let catalog: UnitCatalog = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;
        Ok(catalog.units)
    }
}
