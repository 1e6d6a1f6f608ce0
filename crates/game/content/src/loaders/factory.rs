//! Content factory for building the registry from data files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tower_core::ContentRegistry;
use tower_core::env::{AbilityTraits, CharacterTraits, SpellTraits, TrapTraits};
use tower_core::{ItemTraits, Tables, UnitTraits};

use crate::loaders::{
    AbilityLoader, CharacterLoader, ItemLoader, LoadResult, SpellLoader, TablesLoader, TrapLoader,
    UnitLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tables.toml
/// ├── units.ron
/// ├── spells.ron
/// ├── abilities.ron
/// ├── items.ron
/// ├── traps.ron
/// └── characters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load run tables from `tables.toml`.
    pub fn load_tables(&self) -> LoadResult<Tables> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    /// Load species from `units.ron`.
    pub fn load_units(&self) -> LoadResult<Vec<UnitTraits>> {
        UnitLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load spells from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<Vec<SpellTraits>> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Load abilities from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityTraits>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemTraits>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load traps from `traps.ron`.
    pub fn load_traps(&self) -> LoadResult<Vec<TrapTraits>> {
        TrapLoader::load(&self.data_dir.join("traps.ron"))
    }

    /// Load characters from `characters.ron`.
    pub fn load_characters(&self) -> LoadResult<Vec<CharacterTraits>> {
        CharacterLoader::load(&self.data_dir.join("characters.ron"))
    }

    /// Load every file and assemble a validated registry.
    ///
    /// # Errors
    ///
    /// Fails when a file is missing or malformed, when two entries of the
    /// same kind share a name, or when the assembled content does not pass
    /// [`ContentRegistry::validate`].
    pub fn build_registry(&self) -> LoadResult<ContentRegistry> {
        let mut registry = ContentRegistry::new(self.load_tables()?);

        let units = self.load_units()?;
        ensure_unique("unit", units.iter().map(|u| u.name.as_str()))?;
        let spells = self.load_spells()?;
        ensure_unique("spell", spells.iter().map(|s| s.name.as_str()))?;
        let abilities = self.load_abilities()?;
        ensure_unique("ability", abilities.iter().map(|a| a.name.as_str()))?;
        let items = self.load_items()?;
        ensure_unique("item", items.iter().map(|i| i.name.as_str()))?;
        let traps = self.load_traps()?;
        ensure_unique("trap", traps.iter().map(|t| t.name.as_str()))?;
        let characters = self.load_characters()?;
        ensure_unique("character", characters.iter().map(|c| c.name.as_str()))?;

        tracing::debug!(
            units = units.len(),
            spells = spells.len(),
            abilities = abilities.len(),
            items = items.len(),
            traps = traps.len(),
            characters = characters.len(),
            "loaded content catalogs"
        );

        for unit in units {
            registry.add_unit(unit);
        }
        for spell in spells {
            registry.add_spell(spell);
        }
        for ability in abilities {
            registry.add_ability(ability);
        }
        for item in items {
            registry.add_item(item);
        }
        for trap in traps {
            registry.add_trap(trap);
        }
        for character in characters {
            registry.add_character(character);
        }

        registry
            .validate()
            .with_context(|| format!("Invalid content in {}", self.data_dir.display()))?;
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Load and validate the registry under `data_dir`.
pub fn load_registry(data_dir: impl AsRef<Path>) -> LoadResult<ContentRegistry> {
    let data_dir = data_dir.as_ref();
    let registry = ContentFactory::new(data_dir).build_registry()?;
    tracing::info!(
        dir = %data_dir.display(),
        units = registry.unit_count(),
        items = registry.item_count(),
        "content ready"
    );
    Ok(registry)
}

/// Registry lookups ignore case, so names must be unique case-insensitively.
fn ensure_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.trim().to_ascii_lowercase()) {
            anyhow::bail!("Duplicate {} '{}'", kind, name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use tower_core::env::{CharacterKind, EventKind};
    use tower_core::{Env, GameMachine, Genus, WeightFormula};

    use super::*;

    fn shipped() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn shipped_content_validates() {
        let registry = load_registry(shipped()).unwrap();
        let env = Env::from_registry(&registry);
        let tables = env.tables();

        assert!(tables.max_floor > 1);
        for starter in &tables.starters {
            assert!(env.unit(starter).is_ok(), "starter {starter}");
        }
        for option in &tables.weights.events {
            assert!(EventKind::from_str(&option.name).is_ok());
        }
        assert!(env.character("merchant").is_ok_and(|c| c.kind == CharacterKind::Trader));
    }

    #[test]
    fn every_genus_has_a_starter() {
        let registry = load_registry(shipped()).unwrap();
        let env = Env::from_registry(&registry);
        let genera: HashSet<Genus> = env
            .tables()
            .starters
            .iter()
            .map(|name| env.unit(name).unwrap().genus)
            .collect();
        assert!(genera.contains(&Genus::Fire));
        assert!(genera.contains(&Genus::Water));
        assert!(genera.contains(&Genus::Wind));
    }

    #[test]
    fn endgame_monsters_only_appear_late() {
        let registry = load_registry(shipped()).unwrap();
        let monsters = &Env::from_registry(&registry).tables().weights.monsters;
        let dragon = monsters
            .iter()
            .find(|option| option.name == "Tower Dragon")
            .unwrap();
        assert!(matches!(
            dragon.formula,
            WeightFormula::FloorProrated { from: 0, .. }
        ));
    }

    #[test]
    fn shipped_content_starts_a_run() {
        let registry = load_registry(shipped()).unwrap();
        let env = Env::from_registry(&registry);
        let starter = env.tables().starters[0].clone();

        let mut machine = GameMachine::new("p1", "Tester", 7, &env);
        let intro = machine
            .on_action(&env, "start", &[], tower_core::Authority::User)
            .unwrap();
        assert!(!intro.is_empty());
        machine
            .on_action(&env, "choose", &[starter], tower_core::Authority::User)
            .unwrap();
        assert!(machine.is_waiting_for_event());
        assert_eq!(machine.context().floor, 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ensure_unique("item", ["Potion", "Ether", "potion"].into_iter()).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate item 'potion'");
    }

    #[test]
    fn missing_directory_fails() {
        assert!(load_registry("/nonexistent/tower-data").is_err());
    }
}
