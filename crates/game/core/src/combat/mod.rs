//! Combat math.
//!
//! This module provides pure functions for damage, hit and critical
//! chances. Randomness is drawn by the caller and passed in (the damage roll,
//! the critical flag), so every function here is deterministic.
//!
//! # Core Functions
//!
//! - `physical_damage`: attack vs defense with elemental and height advantage
//! - `spell_damage`: spell power vs defense with elemental advantage
//! - `hit_chance` / `critical_chance`: luck-driven probabilities

pub mod damage;
pub mod hit;

pub use damage::{
    DamageRoll, DefenseProfile, PhysicalDamage, StrikeProfile, physical_damage, spell_damage,
};
pub use hit::{Chance, critical_chance, hit_chance};
