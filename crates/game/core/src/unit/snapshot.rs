use std::collections::BTreeMap;

use super::{LearnedSpell, Status, StatusKind, StatusSet, Talent, Unit};
use crate::config::GameConfig;
use crate::env::Env;
use crate::state::SnapshotError;

/// Persisted form of a [`Unit`]: content is referenced by name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSnapshot {
    pub species: String,
    pub level: u32,
    pub exp: u32,
    pub hp: u32,
    pub mp: u32,
    pub talents: Talent,
    pub statuses: Status,
    #[cfg_attr(feature = "serde", serde(default))]
    pub durations: BTreeMap<StatusKind, u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spell: Option<(String, u8)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability: Option<String>,
    pub stats_boost: u32,
}

impl Unit {
    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            species: self.traits.name.clone(),
            level: self.level,
            exp: self.exp,
            hp: self.hp,
            mp: self.mp,
            talents: self.talents,
            statuses: self.statuses.flags(),
            durations: self.statuses.durations().clone(),
            spell: self
                .spell
                .as_ref()
                .map(|spell| (spell.traits.name.clone(), spell.level)),
            ability: self.ability.as_ref().map(|ability| ability.name.clone()),
            stats_boost: self.stats_boost,
        }
    }
}

impl UnitSnapshot {
    /// Re-resolve content and re-validate every range.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` on unknown content or out-of-range values.
    pub fn hydrate(&self, env: &Env<'_>) -> Result<Unit, SnapshotError> {
        let traits = env.unit(&self.species)?;
        let levels = &env.tables().levels;

        if !(1..=levels.max_level()).contains(&self.level) {
            return Err(SnapshotError::out_of_range("unit.level", self.level));
        }
        if let Some(next) = levels.threshold(self.level + 1) {
            if self.exp >= next {
                return Err(SnapshotError::out_of_range("unit.exp", self.exp));
            }
        }
        let statuses = StatusSet::from_parts(self.statuses, self.durations.clone())
            .ok_or(SnapshotError::Inconsistent("status durations"))?;
        let spell = match &self.spell {
            Some((name, level)) => {
                if !(1..=GameConfig::MAX_SPELL_LEVEL).contains(level) {
                    return Err(SnapshotError::out_of_range("unit.spell_level", *level));
                }
                Some(LearnedSpell {
                    traits: env.spell(name)?,
                    level: *level,
                })
            }
            None => None,
        };
        let ability = self.ability.as_deref().map(|name| env.ability(name)).transpose()?;
        if !(GameConfig::NEUTRAL_BOOST..=GameConfig::MAX_BOOST).contains(&self.stats_boost) {
            return Err(SnapshotError::out_of_range("unit.stats_boost", self.stats_boost));
        }

        let unit = Unit {
            traits,
            level: self.level,
            exp: self.exp,
            hp: self.hp,
            mp: self.mp,
            talents: self.talents,
            statuses,
            spell,
            ability,
            stats_boost: self.stats_boost,
        };
        if unit.hp > unit.max_hp() {
            return Err(SnapshotError::out_of_range("unit.hp", unit.hp));
        }
        if unit.mp > unit.max_mp() {
            return Err(SnapshotError::out_of_range("unit.mp", unit.mp));
        }
        Ok(unit)
    }
}
