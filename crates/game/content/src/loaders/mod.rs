//! Content loaders for reading game data from files.
//!
//! Every catalog is a RON file holding a single struct with one list field;
//! tables are TOML. [`ContentFactory`] ties them together and validates the
//! resulting registry.

pub mod events;
pub mod factory;
pub mod items;
pub mod spells;
pub mod tables;
pub mod units;

pub use events::{CharacterLoader, TrapLoader};
pub use factory::{ContentFactory, load_registry};
pub use items::ItemLoader;
pub use spells::{AbilityLoader, SpellLoader};
pub use tables::TablesLoader;
pub use units::UnitLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Read and parse a RON catalog file.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content).map_err(|e| {
        anyhow::anyhow!("Failed to parse {} RON at {}: {}", what, path.display(), e)
    })
}
