use bitflags::bitflags;

bitflags! {
    /// Permanent passive modifiers of a unit.
    ///
    /// Each stat-increase talent doubles the matching derived stat.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Talent: u16 {
        const HP_INCREASE = 1 << 0;
        const MP_INCREASE = 1 << 1;
        const ATTACK_INCREASE = 1 << 2;
        const DEFENSE_INCREASE = 1 << 3;
        const LUCK_INCREASE = 1 << 4;
        /// Critical chance divisor drops from 64 to 2.
        const EASY_CRITS = 1 << 5;
        /// Two consecutive turns against a non-quick opponent.
        const QUICK = 1 << 6;
        /// Reflects a quarter of physical damage taken.
        const THORNS = 1 << 7;
    }
}

impl Talent {
    /// Multiplier applied to a stat guarded by `flag`.
    pub fn multiplier(self, flag: Talent) -> u32 {
        if self.contains(flag) { 2 } else { 1 }
    }
}
