//! Spell and ability catalog loaders.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::env::{AbilityTraits, SpellTraits};

use crate::loaders::{LoadResult, read_ron};

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalog {
    pub spells: Vec<SpellTraits>,
}

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityTraits>,
}

pub struct SpellLoader;

impl SpellLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpellTraits>> {
        let catalog: SpellCatalog = read_ron(path, "spell catalog")?;
        Ok(catalog.spells)
    }
}

pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityTraits>> {
        let catalog: AbilityCatalog = read_ron(path, "ability catalog")?;
        Ok(catalog.abilities)
    }
}

#[cfg(test)]
mod tests {
    use tower_core::env::{AbilityBehavior, SpellEffect};
    use tower_core::{Genus, StatusKind};

    use super::*;

    #[test]
    fn effects_parse_from_variant_syntax() {
        let catalog: SpellCatalog = ron::from_str(
            r#"(
                spells: [
                    (name: "Gust", genus: wind, power: 6, mp_cost: 3, effect: Damage),
                    (
                        name: "Lullaby",
                        genus: empty,
                        mp_cost: 3,
                        effect: Inflict(status: sleep, turns: 2, chance: 60),
                    ),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(catalog.spells[0].genus, Genus::Wind);
        assert_eq!(catalog.spells[0].effect, SpellEffect::Damage);
        assert_eq!(catalog.spells[1].power, 0);
        assert_eq!(
            catalog.spells[1].effect,
            SpellEffect::Inflict {
                status: StatusKind::Sleep,
                turns: 2,
                chance: 60,
            }
        );
    }

    #[test]
    fn passive_abilities_cost_nothing() {
        let catalog: AbilityCatalog = ron::from_str(
            r#"(abilities: [(name: "Claws", behavior: Weapon(bonus: 4))])"#,
        )
        .unwrap();
        let claws = &catalog.abilities[0];
        assert_eq!(claws.mp_cost, 0);
        assert_eq!(claws.behavior, AbilityBehavior::Weapon { bonus: 4 });
        assert!(claws.behavior.is_passive());
    }
}
