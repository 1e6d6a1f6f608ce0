//! Tuning and weight tables loader.

use std::path::Path;

use tower_core::Tables;

use crate::loaders::{LoadResult, read_file};

/// Loader for run tables from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load tables from a TOML file.
    ///
    /// Only the shape is checked here; cross references are validated once
    /// the whole registry is assembled.
    pub fn load(path: &Path) -> LoadResult<Tables> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML at {}: {}", path.display(), e))
    }

    pub fn parse(source: &str) -> LoadResult<Tables> {
        let tables: Tables = toml::from_str(source)?;
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use tower_core::selection::PenaltyHandler;
    use tower_core::{GameConfig, WeightFormula};

    use super::*;

    const MINIMAL: &str = r#"
max_floor = 5
prepare_turns = 2
dormant_spell_level = 4
starters = ["Ember"]
levels = [10, 30, 60]

[weights]
events = [
    { name = "battle", formula = { kind = "static", weight = 10 } },
    { name = "elevator", formula = { kind = "floor_prorated", start = 1, end = 5, from = 0, to = 4 }, penalty = { kind = "force_zero", duration = 2 } },
]
monsters = [{ name = "Goblin", formula = { kind = "static", weight = 1 } }]
items = []
traps = []
characters = []
familiars = []
trades = []
"#;

    #[test]
    fn defaults_fill_optional_tables() {
        let tables = TablesLoader::parse(MINIMAL).unwrap();
        assert_eq!(tables.max_floor, 5);
        assert_eq!(
            tables.inventory_capacity,
            GameConfig::DEFAULT_INVENTORY_CAPACITY
        );
        assert_eq!(tables.flee.prepare, 75);
        assert_eq!(tables.enemy_level_spread, 0);
        assert_eq!(tables.levels.max_level(), 4);
        assert_eq!(tables.weights.events.len(), 2);
        assert_eq!(
            tables.weights.events[1].penalty,
            PenaltyHandler::ForceZero { duration: 2 }
        );
        assert_eq!(tables.weights.events[0].penalty, PenaltyHandler::None);
    }

    #[test]
    fn missing_required_fields_fail() {
        let err = TablesLoader::parse("max_floor = 5").unwrap_err();
        assert!(err.to_string().contains("prepare_turns"));
    }
}
