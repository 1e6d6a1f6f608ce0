//! Hit and critical chances.

use crate::env::RandomSource;

/// A probability `numerator / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chance {
    pub numerator: u32,
    pub denominator: u32,
}

impl Chance {
    pub const NEVER: Chance = Chance {
        numerator: 0,
        denominator: 1,
    };

    pub fn roll(&self, rng: &mut dyn RandomSource) -> bool {
        rng.chance(self.numerator, self.denominator)
    }
}

/// Chance that a physical attack connects.
///
/// `(luck - 1) / luck`, a guaranteed miss at zero luck, halved once for a
/// blinded attacker and once more for an invisible defender.
pub fn hit_chance(luck: u32, attacker_blind: bool, defender_invisible: bool) -> Chance {
    if luck == 0 {
        return Chance::NEVER;
    }
    let halvings = u32::from(attacker_blind) + u32::from(defender_invisible);
    Chance {
        numerator: luck - 1,
        denominator: luck.saturating_mul(1 << halvings),
    }
}

/// Chance of a critical hit: `(luck / divisor + 1) / 128`.
///
/// The divisor is 2 with the easy-crits talent, 64 otherwise.
pub fn critical_chance(luck: u32, easy_crits: bool) -> Chance {
    let divisor = if easy_crits { 2 } else { 64 };
    Chance {
        numerator: luck / divisor + 1,
        denominator: 128,
    }
}
