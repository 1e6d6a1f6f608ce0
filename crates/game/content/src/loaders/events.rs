//! Trap and character catalog loaders.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::env::{CharacterTraits, TrapTraits};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapCatalog {
    pub traps: Vec<TrapTraits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterCatalog {
    pub characters: Vec<CharacterTraits>,
}

pub struct TrapLoader;

impl TrapLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<TrapTraits>> {
        let catalog: TrapCatalog = read_ron(path, "trap catalog")?;
        Ok(catalog.traps)
    }
}

pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CharacterTraits>> {
        let catalog: CharacterCatalog = read_ron(path, "character catalog")?;
        Ok(catalog.characters)
    }
}
