/// Behaviour family of an ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityBehavior {
    /// Passive flat bonus added to every physical attack.
    Weapon { bonus: u32 },
    /// Restores a percentage of max HP.
    Heal { percent: u32 },
    /// Raises the stats boost to `boost` percent until the battle ends.
    Focus { boost: u32 },
    /// Removes every debuff from the user.
    Purify,
}

impl AbilityBehavior {
    pub const fn is_passive(&self) -> bool {
        matches!(self, Self::Weapon { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityTraits {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_cost: u32,
    pub behavior: AbilityBehavior,
}

impl AbilityTraits {
    /// Flat physical bonus contributed by a weapon ability.
    pub fn weapon_bonus(&self) -> u32 {
        match self.behavior {
            AbilityBehavior::Weapon { bonus } => bonus,
            _ => 0,
        }
    }
}
