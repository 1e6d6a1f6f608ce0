//! Damage calculation.

use crate::env::RandomSource;
use crate::selection::weighted_index;
use crate::unit::{Genus, Unit};

/// Variance roll of a physical attack, weighted Low:Normal:High = 1:2:1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DamageRoll {
    Low,
    Normal,
    High,
}

impl DamageRoll {
    const ALL: [DamageRoll; 3] = [Self::Low, Self::Normal, Self::High];
    const WEIGHTS: [u32; 3] = [1, 2, 1];

    pub const fn value(self) -> u32 {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::High => 2,
        }
    }

    pub fn roll(rng: &mut dyn RandomSource) -> Self {
        weighted_index(&Self::WEIGHTS, rng).map_or(Self::Normal, |index| Self::ALL[index])
    }
}

/// Offensive side of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeProfile {
    pub attack: u32,
    pub weapon_bonus: u32,
    pub genus: Genus,
    pub height: i32,
}

impl StrikeProfile {
    pub fn of(unit: &Unit) -> Self {
        Self {
            attack: unit.attack(),
            weapon_bonus: unit.weapon_bonus(),
            genus: unit.genus(),
            height: unit.statuses().height(),
        }
    }
}

/// Defensive side of an attack of a given genus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenseProfile {
    pub defense: u32,
    pub genus: Genus,
    pub height: i32,
    /// Holds the protection status matching the incoming genus.
    pub protected: bool,
}

impl DefenseProfile {
    pub fn against(unit: &Unit, incoming: Genus) -> Self {
        Self {
            defense: unit.defense(),
            genus: unit.genus(),
            height: unit.statuses().height(),
            protected: unit.statuses().protects_against(incoming),
        }
    }
}

/// Intermediate values of a physical damage computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalDamage {
    /// `2*ATK + roll + weapon`, quartered when the defender is protected.
    pub base: i64,
    /// Height plus (unless protected) elemental advantage.
    pub advantage: i64,
    /// `base + floor(base*advantage/8) - DEF`.
    pub raw: i64,
    /// Final damage, at least 1.
    pub damage: u32,
}

/// Physical damage dealt by `strike` to `defense`.
///
/// ```text
/// base      = 2*ATK + roll + weapon_bonus        (// 4 when protected)
/// advantage = clamp(height diff, -1, 1) + elemental (elemental omitted when protected)
/// raw       = base + floor(base * advantage / 8) - DEF
/// damage    = max(1, floor(raw / 2 * (1.5 if critical)))
/// ```
pub fn physical_damage(
    strike: &StrikeProfile,
    defense: &DefenseProfile,
    roll: DamageRoll,
    critical: bool,
) -> PhysicalDamage {
    let mut base = 2 * i64::from(strike.attack)
        + i64::from(roll.value())
        + i64::from(strike.weapon_bonus);
    let height = i64::from((strike.height - defense.height).clamp(-1, 1));
    let advantage = if defense.protected {
        base /= 4;
        height
    } else {
        height + i64::from(strike.genus.advantage_against(defense.genus))
    };
    let raw = base + (base * advantage).div_euclid(8) - i64::from(defense.defense);
    let scaled = if critical {
        (raw * 3).div_euclid(4)
    } else {
        raw.div_euclid(2)
    };
    PhysicalDamage {
        base,
        advantage,
        raw,
        damage: clamp_damage(scaled),
    }
}

/// Damage of a damage spell of `power` at `spell_level`.
///
/// ```text
/// base   = (power + spell_level) * 2             (// 4 when protected, no term)
/// term   = +floor(base/8) when strong, -ceil(base/8) when weak
/// damage = max(1, floor((base + term - DEF) / 2))
/// ```
pub fn spell_damage(power: u32, spell_level: u8, genus: Genus, defense: &DefenseProfile) -> u32 {
    let mut base = (i64::from(power) + i64::from(spell_level)) * 2;
    let term = if defense.protected {
        base /= 4;
        0
    } else {
        match genus.advantage_against(defense.genus).signum() {
            1 => base / 8,
            -1 => -((base + 7) / 8),
            _ => 0,
        }
    };
    clamp_damage((base + term - i64::from(defense.defense)).div_euclid(2))
}

fn clamp_damage(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(attack: u32, genus: Genus) -> StrikeProfile {
        StrikeProfile {
            attack,
            weapon_bonus: 0,
            genus,
            height: 0,
        }
    }

    fn defense(def: u32, genus: Genus, protected: bool) -> DefenseProfile {
        DefenseProfile {
            defense: def,
            genus,
            height: 0,
            protected,
        }
    }

    #[test]
    fn neutral_normal_hit() {
        let result = physical_damage(
            &strike(20, Genus::Fire),
            &defense(5, Genus::Empty, false),
            DamageRoll::Normal,
            false,
        );
        assert_eq!(result.base, 41);
        assert_eq!(result.raw, 36);
        assert_eq!(result.damage, 18);
    }

    #[test]
    fn critical_multiplies_by_one_and_a_half() {
        let result = physical_damage(
            &strike(20, Genus::Fire),
            &defense(5, Genus::Empty, false),
            DamageRoll::Normal,
            true,
        );
        assert_eq!(result.damage, 27);
    }

    #[test]
    fn weapon_bonus_enters_base_before_advantage() {
        let mut sword = strike(20, Genus::Water);
        sword.weapon_bonus = 7;
        let result = physical_damage(
            &sword,
            &defense(5, Genus::Fire, false),
            DamageRoll::Low,
            false,
        );
        assert_eq!(result.base, 47);
        assert_eq!(result.advantage, 1);
        assert_eq!(result.raw, 47 + 47 / 8 - 5);
    }

    #[test]
    fn protection_quarters_base_and_drops_elemental_term() {
        for attack in [1, 7, 20, 55, 200] {
            for roll in [DamageRoll::Low, DamageRoll::Normal, DamageRoll::High] {
                let unprotected_base = i64::from(2 * attack + roll.value());
                let result = physical_damage(
                    &strike(attack, Genus::Water),
                    &defense(1, Genus::Fire, true),
                    roll,
                    false,
                );
                assert_eq!(result.base, unprotected_base / 4);
                assert_eq!(result.advantage, 0);
            }
        }
    }

    #[test]
    fn extreme_stats_clamp_instead_of_overflowing() {
        let mut titan = strike(u32::MAX, Genus::Fire);
        titan.weapon_bonus = u32::MAX;
        let result = physical_damage(
            &titan,
            &defense(0, Genus::Wind, false),
            DamageRoll::High,
            true,
        );
        assert_eq!(result.base, 3 * i64::from(u32::MAX) + 2);
        assert_eq!(result.damage, u32::MAX);
    }

    #[test]
    fn height_advantage_survives_protection() {
        let mut high = strike(40, Genus::Water);
        high.height = 1;
        let result = physical_damage(
            &high,
            &defense(1, Genus::Fire, true),
            DamageRoll::Normal,
            false,
        );
        assert_eq!(result.advantage, 1);
    }

    #[test]
    fn physical_damage_is_at_least_one() {
        for attack in [1, 2, 5] {
            for def in [1, 50, 10_000] {
                for critical in [false, true] {
                    let result = physical_damage(
                        &strike(attack, Genus::Fire),
                        &defense(def, Genus::Water, false),
                        DamageRoll::Low,
                        critical,
                    );
                    assert!(result.damage >= 1);
                }
            }
        }
    }

    #[test]
    fn spell_damage_elemental_terms() {
        let neutral = spell_damage(8, 1, Genus::Fire, &defense(2, Genus::Empty, false));
        // base 18, no term
        assert_eq!(neutral, 8);
        let strong = spell_damage(8, 1, Genus::Fire, &defense(2, Genus::Wind, false));
        // base 18 + 2
        assert_eq!(strong, 9);
        let weak = spell_damage(8, 1, Genus::Fire, &defense(2, Genus::Water, false));
        // base 18 - ceil(18/8) = 18 - 3
        assert_eq!(weak, 6);
        let shielded = spell_damage(8, 1, Genus::Fire, &defense(2, Genus::Wind, true));
        // base 18 / 4 = 4
        assert_eq!(shielded, 1);
        assert_eq!(
            spell_damage(0, 1, Genus::Fire, &defense(500, Genus::Empty, false)),
            1
        );
    }

    #[test]
    fn roll_uses_one_two_one_weights() {
        struct Fixed(u32);
        impl RandomSource for Fixed {
            fn next_u32(&mut self) -> u32 {
                self.0
            }
        }
        assert_eq!(DamageRoll::roll(&mut Fixed(0)), DamageRoll::Low);
        assert_eq!(DamageRoll::roll(&mut Fixed(1)), DamageRoll::Normal);
        assert_eq!(DamageRoll::roll(&mut Fixed(2)), DamageRoll::Normal);
        assert_eq!(DamageRoll::roll(&mut Fixed(3)), DamageRoll::High);
    }
}
