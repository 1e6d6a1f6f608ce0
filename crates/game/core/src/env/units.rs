//! Species definitions for familiars and monsters.
use crate::unit::{Genus, Talent};

/// The five primary stats of a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub luck: u32,
}

impl StatBlock {
    /// Stats at `level` growing linearly from `self` by `growth` per level.
    pub fn at_level(&self, growth: &StatBlock, level: u32) -> StatBlock {
        let steps = level.saturating_sub(1);
        StatBlock {
            hp: self.hp + growth.hp * steps,
            mp: self.mp + growth.mp * steps,
            attack: self.attack + growth.attack * steps,
            defense: self.defense + growth.defense * steps,
            luck: self.luck + growth.luck * steps,
        }
    }
}

/// Relative weights the battle AI gives to its options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionWeights {
    pub attack: u32,
    pub spell: u32,
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self { attack: 3, spell: 1 }
    }
}

/// Species a unit turns into once it reaches `level`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evolution {
    pub into: String,
    pub level: u32,
}

/// Immutable definition of a species.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTraits {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub genus: Genus,
    pub base: StatBlock,
    pub growth: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub talents: Talent,
    /// Spell known from level 1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub spell: Option<String>,
    /// Spell awakened at the configured level when no spell is known yet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dormant_spell: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weights: ActionWeights,
    #[cfg_attr(feature = "serde", serde(default))]
    pub evolution: Option<Evolution>,
    /// Experience granted per enemy level when this species is defeated.
    pub exp_yield: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_grow_linearly() {
        let base = StatBlock {
            hp: 30,
            mp: 10,
            attack: 8,
            defense: 4,
            luck: 20,
        };
        let growth = StatBlock {
            hp: 5,
            mp: 2,
            attack: 2,
            defense: 1,
            luck: 1,
        };
        assert_eq!(base.at_level(&growth, 1), base);
        let level_4 = base.at_level(&growth, 4);
        assert_eq!(level_4.hp, 45);
        assert_eq!(level_4.attack, 14);
        assert_eq!(level_4.luck, 23);
    }
}
