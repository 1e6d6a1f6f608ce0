//! Traits describing read-only game content.
//!
//! Oracles expose species, spells, abilities, items, traps, characters and
//! tuning tables. The [`Env`] aggregate bundles them so the rules can look
//! content up by name without depending on how it was loaded.
mod abilities;
mod error;
mod events;
mod items;
mod registry;
mod rng;
mod spells;
mod tables;
mod units;

use std::sync::Arc;

pub use abilities::{AbilityBehavior, AbilityTraits};
pub use error::{ContentError, OracleError};
pub use events::{CharacterKind, CharacterTraits, EventKind, TrapEffect, TrapTraits};
pub use items::{ItemBehavior, ItemClass, ItemTraits};
pub use registry::ContentRegistry;
pub use rng::{PcgRng, RandomSource};
pub use spells::{SpellEffect, SpellTraits};
pub use tables::{FleeChances, LevelTable, Tables, WeightTables};
pub use units::{ActionWeights, Evolution, StatBlock, UnitTraits};

/// Species lookup.
pub trait UnitOracle: Send + Sync {
    fn unit(&self, name: &str) -> Option<Arc<UnitTraits>>;
}

/// Spell lookup.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, name: &str) -> Option<Arc<SpellTraits>>;
}

/// Ability lookup.
pub trait AbilityOracle: Send + Sync {
    fn ability(&self, name: &str) -> Option<Arc<AbilityTraits>>;
}

/// Item lookup.
pub trait ItemOracle: Send + Sync {
    fn item(&self, name: &str) -> Option<Arc<ItemTraits>>;
}

/// Trap and character lookup.
pub trait EventOracle: Send + Sync {
    fn trap(&self, name: &str) -> Option<Arc<TrapTraits>>;
    fn character(&self, name: &str) -> Option<Arc<CharacterTraits>>;
}

/// Tuning tables.
pub trait TablesOracle: Send + Sync {
    fn tables(&self) -> &Tables;
}

/// Aggregates the read-only oracles required by the rules.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    units: &'a dyn UnitOracle,
    spells: &'a dyn SpellOracle,
    abilities: &'a dyn AbilityOracle,
    items: &'a dyn ItemOracle,
    events: &'a dyn EventOracle,
    tables: &'a dyn TablesOracle,
}

impl<'a> Env<'a> {
    pub fn with_all(
        units: &'a dyn UnitOracle,
        spells: &'a dyn SpellOracle,
        abilities: &'a dyn AbilityOracle,
        items: &'a dyn ItemOracle,
        events: &'a dyn EventOracle,
        tables: &'a dyn TablesOracle,
    ) -> Self {
        Self {
            units,
            spells,
            abilities,
            items,
            events,
            tables,
        }
    }

    /// Environment backed by a single registry implementing every oracle.
    pub fn from_registry(registry: &'a ContentRegistry) -> Self {
        Self::with_all(registry, registry, registry, registry, registry, registry)
    }

    pub fn tables(&self) -> &'a Tables {
        self.tables.tables()
    }

    /// # Errors
    ///
    /// Returns `OracleError::UnitNotFound` if the species is unknown.
    pub fn unit(&self, name: &str) -> Result<Arc<UnitTraits>, OracleError> {
        self.units
            .unit(name)
            .ok_or_else(|| OracleError::UnitNotFound(name.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `OracleError::SpellNotFound` if the spell is unknown.
    pub fn spell(&self, name: &str) -> Result<Arc<SpellTraits>, OracleError> {
        self.spells
            .spell(name)
            .ok_or_else(|| OracleError::SpellNotFound(name.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `OracleError::AbilityNotFound` if the ability is unknown.
    pub fn ability(&self, name: &str) -> Result<Arc<AbilityTraits>, OracleError> {
        self.abilities
            .ability(name)
            .ok_or_else(|| OracleError::AbilityNotFound(name.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `OracleError::ItemNotFound` if the item is unknown.
    pub fn item(&self, name: &str) -> Result<Arc<ItemTraits>, OracleError> {
        self.items
            .item(name)
            .ok_or_else(|| OracleError::ItemNotFound(name.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `OracleError::TrapNotFound` if the trap is unknown.
    pub fn trap(&self, name: &str) -> Result<Arc<TrapTraits>, OracleError> {
        self.events
            .trap(name)
            .ok_or_else(|| OracleError::TrapNotFound(name.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `OracleError::CharacterNotFound` if the character is unknown.
    pub fn character(&self, name: &str) -> Result<Arc<CharacterTraits>, OracleError> {
        self.events
            .character(name)
            .ok_or_else(|| OracleError::CharacterNotFound(name.to_owned()))
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env").finish_non_exhaustive()
    }
}
