//! In-memory content registry implementing every oracle.
//!
//! Built once at startup (by the content loader or by tests) and shared
//! read-only behind an `Arc`. Lookups are case-insensitive.
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use super::{
    AbilityOracle, AbilityTraits, CharacterKind, CharacterTraits, ContentError, EventKind,
    EventOracle, ItemBehavior, ItemOracle, ItemTraits, SpellOracle, SpellTraits, Tables,
    TablesOracle, TrapTraits, UnitOracle, UnitTraits,
};
use crate::config::GameConfig;
use crate::selection::{WeightContext, WeightedOption};

fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    units: HashMap<String, Arc<UnitTraits>>,
    spells: HashMap<String, Arc<SpellTraits>>,
    abilities: HashMap<String, Arc<AbilityTraits>>,
    items: HashMap<String, Arc<ItemTraits>>,
    traps: HashMap<String, Arc<TrapTraits>>,
    characters: HashMap<String, Arc<CharacterTraits>>,
    tables: Tables,
}

impl ContentRegistry {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    pub fn add_unit(&mut self, unit: UnitTraits) -> &mut Self {
        self.units.insert(key(&unit.name), Arc::new(unit));
        self
    }

    pub fn add_spell(&mut self, spell: SpellTraits) -> &mut Self {
        self.spells.insert(key(&spell.name), Arc::new(spell));
        self
    }

    pub fn add_ability(&mut self, ability: AbilityTraits) -> &mut Self {
        self.abilities.insert(key(&ability.name), Arc::new(ability));
        self
    }

    pub fn add_item(&mut self, item: ItemTraits) -> &mut Self {
        self.items.insert(key(&item.name), Arc::new(item));
        self
    }

    pub fn add_trap(&mut self, trap: TrapTraits) -> &mut Self {
        self.traps.insert(key(&trap.name), Arc::new(trap));
        self
    }

    pub fn add_character(&mut self, character: CharacterTraits) -> &mut Self {
        self.characters
            .insert(key(&character.name), Arc::new(character));
        self
    }

    pub fn tables_mut(&mut self) -> &mut Tables {
        &mut self.tables
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check every cross reference and every weight table.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ContentError> {
        self.validate_units()?;
        self.validate_items()?;
        self.validate_tables()?;
        self.validate_weights()
    }

    fn validate_units(&self) -> Result<(), ContentError> {
        for unit in self.units.values() {
            let unknown = |kind: &'static str, name: &str| ContentError::UnknownReference {
                owner: unit.name.clone(),
                kind,
                name: name.to_owned(),
            };
            for spell in unit.spell.iter().chain(unit.dormant_spell.iter()) {
                if !self.spells.contains_key(&key(spell)) {
                    return Err(unknown("spell", spell));
                }
            }
            if let Some(ability) = &unit.ability {
                if !self.abilities.contains_key(&key(ability)) {
                    return Err(unknown("ability", ability));
                }
            }
            if let Some(evolution) = &unit.evolution {
                if !self.units.contains_key(&key(&evolution.into)) {
                    return Err(unknown("unit", &evolution.into));
                }
                if evolution.level < 2 {
                    return Err(ContentError::InvalidTable(format!(
                        "{} evolves at level {}",
                        unit.name, evolution.level
                    )));
                }
            }
            if unit.base.hp == 0 || unit.base.defense == 0 || unit.base.attack == 0 {
                return Err(ContentError::InvalidTable(format!(
                    "{} needs positive hp, attack and defense",
                    unit.name
                )));
            }
        }
        Ok(())
    }

    fn validate_items(&self) -> Result<(), ContentError> {
        for item in self.items.values() {
            if let ItemBehavior::Tome { spell } = &item.behavior {
                if !self.spells.contains_key(&key(spell)) {
                    return Err(ContentError::UnknownReference {
                        owner: item.name.clone(),
                        kind: "spell",
                        name: spell.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_tables(&self) -> Result<(), ContentError> {
        let tables = &self.tables;
        if tables.max_floor == 0 {
            return Err(ContentError::InvalidTable("max_floor must be at least 1".into()));
        }
        if !(1..=GameConfig::MAX_INVENTORY_SLOTS).contains(&tables.inventory_capacity) {
            return Err(ContentError::InvalidTable(format!(
                "inventory_capacity must be within 1..={}",
                GameConfig::MAX_INVENTORY_SLOTS
            )));
        }
        if !tables.levels.is_monotonic() {
            return Err(ContentError::InvalidTable(
                "level thresholds must strictly increase".into(),
            ));
        }
        if tables.flee.prepare > 100 || tables.flee.battle > 100 {
            return Err(ContentError::InvalidTable("flee chances are percentages".into()));
        }
        if tables.starters.is_empty() {
            return Err(ContentError::InvalidTable("no starter familiars".into()));
        }
        for starter in &tables.starters {
            if !self.units.contains_key(&key(starter)) {
                return Err(ContentError::UnknownOption {
                    table: "starters",
                    name: starter.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_weights(&self) -> Result<(), ContentError> {
        let weights = &self.tables.weights;
        self.check_table("events", &weights.events, |name| {
            EventKind::from_str(name).is_ok()
        })?;
        self.check_table("monsters", &weights.monsters, |name| {
            self.units.contains_key(&key(name))
        })?;

        let events: Vec<EventKind> = weights
            .events
            .iter()
            .filter_map(|option| EventKind::from_str(&option.name).ok())
            .collect();
        let needs = |kind: EventKind| events.contains(&kind);

        if needs(EventKind::Item) {
            self.check_table("items", &weights.items, |name| {
                self.items.contains_key(&key(name))
            })?;
        }
        if needs(EventKind::Trap) {
            self.check_table("traps", &weights.traps, |name| {
                self.traps.contains_key(&key(name))
            })?;
        }
        if needs(EventKind::Familiar) {
            self.check_table("familiars", &weights.familiars, |name| {
                self.units.contains_key(&key(name))
            })?;
        }
        if needs(EventKind::Character) {
            self.check_table("characters", &weights.characters, |name| {
                self.characters.contains_key(&key(name))
            })?;
            let has_trader = weights.characters.iter().any(|option| {
                self.characters
                    .get(&key(&option.name))
                    .is_some_and(|c| c.kind == CharacterKind::Trader)
            });
            if has_trader {
                self.check_table("trades", &weights.trades, |name| {
                    self.items.contains_key(&key(name))
                })?;
            }
        }
        Ok(())
    }

    fn check_table(
        &self,
        table: &'static str,
        options: &[WeightedOption],
        exists: impl Fn(&str) -> bool,
    ) -> Result<(), ContentError> {
        if let Some(unknown) = options.iter().find(|option| !exists(&option.name)) {
            return Err(ContentError::UnknownOption {
                table,
                name: unknown.name.clone(),
            });
        }
        let max_level = self.tables.levels.max_level();
        for floor in 1..=self.tables.max_floor {
            for level in [1, max_level] {
                let ctx = WeightContext { floor, level };
                let total: u64 = options
                    .iter()
                    .map(|option| u64::from(option.formula.weight(&ctx)))
                    .sum();
                if total == 0 {
                    return Err(ContentError::DegenerateWeights(table));
                }
            }
        }
        Ok(())
    }
}

impl UnitOracle for ContentRegistry {
    fn unit(&self, name: &str) -> Option<Arc<UnitTraits>> {
        self.units.get(&key(name)).cloned()
    }
}

impl SpellOracle for ContentRegistry {
    fn spell(&self, name: &str) -> Option<Arc<SpellTraits>> {
        self.spells.get(&key(name)).cloned()
    }
}

impl AbilityOracle for ContentRegistry {
    fn ability(&self, name: &str) -> Option<Arc<AbilityTraits>> {
        self.abilities.get(&key(name)).cloned()
    }
}

impl ItemOracle for ContentRegistry {
    fn item(&self, name: &str) -> Option<Arc<ItemTraits>> {
        self.items.get(&key(name)).cloned()
    }
}

impl EventOracle for ContentRegistry {
    fn trap(&self, name: &str) -> Option<Arc<TrapTraits>> {
        self.traps.get(&key(name)).cloned()
    }

    fn character(&self, name: &str) -> Option<Arc<CharacterTraits>> {
        self.characters.get(&key(name)).cloned()
    }
}

impl TablesOracle for ContentRegistry {
    fn tables(&self) -> &Tables {
        &self.tables
    }
}
