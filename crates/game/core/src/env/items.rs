/// Behaviour of an item when used.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemBehavior {
    RestoreHp { amount: u32 },
    RestoreMp { amount: u32 },
    /// Removes every debuff.
    Cure,
    /// Restores HP and MP fully.
    Elixir,
    /// Enemy turns are suppressed for `turns` rounds.
    HolyScroll { turns: u8 },
    /// Fixed damage to the enemy, ignoring defense.
    Bomb { damage: u32 },
    /// Ends the battle immediately.
    SmokeBomb,
    /// Teaches a spell, or raises its level if already known.
    Tome { spell: String },
}

/// Coarse grouping of items; a trader refuses to swap within a class.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum ItemClass {
    Potion,
    Ether,
    Cure,
    Elixir,
    Scroll,
    Bomb,
    SmokeBomb,
    Tome,
}

impl ItemBehavior {
    pub const fn class(&self) -> ItemClass {
        match self {
            Self::RestoreHp { .. } => ItemClass::Potion,
            Self::RestoreMp { .. } => ItemClass::Ether,
            Self::Cure => ItemClass::Cure,
            Self::Elixir => ItemClass::Elixir,
            Self::HolyScroll { .. } => ItemClass::Scroll,
            Self::Bomb { .. } => ItemClass::Bomb,
            Self::SmokeBomb => ItemClass::SmokeBomb,
            Self::Tome { .. } => ItemClass::Tome,
        }
    }

    pub const fn usable_in_battle(&self) -> bool {
        !matches!(self, Self::Tome { .. })
    }

    pub const fn usable_outside_battle(&self) -> bool {
        !matches!(
            self,
            Self::HolyScroll { .. } | Self::Bomb { .. } | Self::SmokeBomb
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTraits {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub behavior: ItemBehavior,
}

impl ItemTraits {
    pub fn class(&self) -> ItemClass {
        self.behavior.class()
    }
}
