//! Non-battle event content: traps and characters.
use crate::unit::StatusKind;

/// Top-level kinds of tower events, named after their dispatch command.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventKind {
    Battle,
    Item,
    Trap,
    Character,
    Elevator,
    Familiar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapEffect {
    /// Loses a percentage of max HP, never below 1 HP.
    Damage { percent: u32 },
    Inflict { status: StatusKind, turns: u8 },
    /// Wakes a monster; a battle follows.
    Alarm,
    /// Drops the player one floor.
    Pitfall,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapTraits {
    pub name: String,
    pub description: String,
    pub effect: TrapEffect,
}

/// Role a character plays when met.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CharacterKind {
    Trader,
    Healer,
    Sage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterTraits {
    pub name: String,
    pub kind: CharacterKind,
    pub greeting: String,
}
