use crate::config::GameConfig;
use crate::unit::{Genus, StatusKind};

/// What a spell does once it resolves on its target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    /// Elemental damage scaled by power and spell level.
    Damage,
    /// Chance (percent) to inflict a timed status.
    Inflict {
        status: StatusKind,
        turns: u8,
        chance: u32,
    },
    /// Protection against the spell's own genus.
    Protect { turns: u8 },
    /// Mirror for the spell's own genus, or the universal mirror for `Empty`.
    Reflect { turns: u8 },
    /// Restores HP.
    Heal { amount: u32 },
}

impl SpellEffect {
    /// Whether the caster is the natural target.
    pub const fn targets_self(&self) -> bool {
        matches!(self, Self::Protect { .. } | Self::Reflect { .. } | Self::Heal { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellTraits {
    pub name: String,
    pub genus: Genus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: u32,
    pub mp_cost: u32,
    pub effect: SpellEffect,
}

impl SpellTraits {
    /// Heal amount at `level` (+50% of the base per level above the first).
    pub fn heal_amount(&self, level: u8) -> u32 {
        match self.effect {
            SpellEffect::Heal { amount } => {
                let level = u32::from(level.clamp(1, GameConfig::MAX_SPELL_LEVEL));
                amount + amount * (level - 1) / 2
            }
            _ => 0,
        }
    }

    /// Inflict chance at `level` (+10 points per level above the first, max 100).
    pub fn inflict_chance(&self, level: u8) -> u32 {
        match self.effect {
            SpellEffect::Inflict { chance, .. } => {
                let level = u32::from(level.clamp(1, GameConfig::MAX_SPELL_LEVEL));
                (chance + 10 * (level - 1)).min(100)
            }
            _ => 0,
        }
    }

    /// Status granted by a protect or reflect spell.
    pub fn granted_status(&self) -> Option<StatusKind> {
        match self.effect {
            SpellEffect::Protect { .. } => self.genus.protection(),
            SpellEffect::Reflect { .. } => {
                Some(self.genus.reflection().unwrap_or(StatusKind::Reflect))
            }
            _ => None,
        }
    }
}
