//! Battle resolution.
//!
//! A [`BattleContext`] exists only while a battle is active. The engine's
//! battle states call into this module to open each turn ([`begin_turn`]),
//! pick actions for the enemy and for confused units, and close the battle
//! ([`finish_battle`]).
mod ai;
mod confusion;
mod resolve;
mod turns;

pub use ai::choose_enemy_action;
pub use confusion::{ConfusedChoice, choose_confused_action};
pub use resolve::{BattleOutcome, BattleResult, attempt_flee, finish_battle, is_over};
pub use turns::{TurnDispatch, TurnStart, begin_turn};

use crate::config::GameConfig;
use crate::env::Env;
use crate::state::SnapshotError;
use crate::unit::{Talent, Unit, UnitSnapshot};

/// The two sides of a battle. The player's familiar is always `Player`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Per-battle state, created by the battle start and dropped at its end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleContext {
    pub enemy: Unit,
    /// Turns left before the enemy notices the player. Zero once fighting.
    pub prepare_counter: u8,
    /// Rounds of holy protection left for the player.
    pub holy_scroll: u8,
    /// No turn has been resolved yet.
    pub first_turn: bool,
    /// Side whose turn is resolving (or resolved last).
    pub active: Side,
    /// Consecutive turns already taken by `active`.
    pub sub_turn: u8,
    /// Set by actions that end the battle outright.
    pub finished: bool,
    /// The player opens the fight.
    pub player_starts: bool,
    pub fled: bool,
    /// Turns resolved so far.
    pub turns: u32,
}

impl BattleContext {
    pub fn new(enemy: Unit, prepare_turns: u8) -> Self {
        Self {
            enemy,
            prepare_counter: prepare_turns,
            holy_scroll: 0,
            first_turn: true,
            active: Side::Player,
            sub_turn: 0,
            finished: false,
            player_starts: false,
            fled: false,
            turns: 0,
        }
    }

    pub fn is_preparing(&self) -> bool {
        self.prepare_counter > 0
    }

    /// Whether the holy scroll currently protects the player.
    pub fn shields_player(&self) -> bool {
        self.holy_scroll > 0
    }

    /// Whether the first resolved turn belongs to the player.
    ///
    /// The player opens after approaching, or when Quick against a slower
    /// enemy.
    pub fn decide_opening(&mut self, familiar: &Unit, approached: bool) {
        let player_quick = familiar.has_talent(Talent::QUICK);
        let enemy_quick = self.enemy.has_talent(Talent::QUICK);
        self.player_starts = approached || (player_quick && !enemy_quick);
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            enemy: self.enemy.snapshot(),
            prepare_counter: self.prepare_counter,
            holy_scroll: self.holy_scroll,
            first_turn: self.first_turn,
            active: self.active,
            sub_turn: self.sub_turn,
            finished: self.finished,
            player_starts: self.player_starts,
            fled: self.fled,
            turns: self.turns,
        }
    }
}

/// Persisted form of a [`BattleContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub enemy: UnitSnapshot,
    pub prepare_counter: u8,
    pub holy_scroll: u8,
    pub first_turn: bool,
    pub active: Side,
    pub sub_turn: u8,
    pub finished: bool,
    pub player_starts: bool,
    pub fled: bool,
    pub turns: u32,
}

impl BattleSnapshot {
    /// # Errors
    ///
    /// Returns `SnapshotError` if the enemy does not hydrate or a counter is
    /// out of range.
    pub fn hydrate(&self, env: &Env<'_>) -> Result<BattleContext, SnapshotError> {
        let enemy = self.enemy.hydrate(env)?;
        if self.prepare_counter > env.tables().prepare_turns {
            return Err(SnapshotError::out_of_range(
                "battle.prepare_counter",
                self.prepare_counter,
            ));
        }
        if self.sub_turn > GameConfig::MAX_SUB_TURN {
            return Err(SnapshotError::out_of_range("battle.sub_turn", self.sub_turn));
        }
        Ok(BattleContext {
            enemy,
            prepare_counter: self.prepare_counter,
            holy_scroll: self.holy_scroll,
            first_turn: self.first_turn,
            active: self.active,
            sub_turn: self.sub_turn,
            finished: self.finished,
            player_starts: self.player_starts,
            fled: self.fled,
            turns: self.turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_registry, unit};

    #[test]
    fn opening_goes_to_approach_or_speed() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let ember = unit(&env, "Ember", 1);
        let sprite = unit(&env, "Sprite", 1);

        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 2);
        battle.decide_opening(&ember, false);
        assert!(!battle.player_starts);
        battle.decide_opening(&ember, true);
        assert!(battle.player_starts);
        battle.decide_opening(&sprite, false);
        assert!(battle.player_starts);

        let mut mirror = BattleContext::new(unit(&env, "Sprite", 1), 2);
        mirror.decide_opening(&sprite, false);
        assert!(!mirror.player_starts);
    }

    #[test]
    fn snapshot_rejects_oversized_prepare_counter() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let battle = BattleContext::new(unit(&env, "Goblin", 2), 2);
        let mut snapshot = battle.snapshot();
        assert_eq!(snapshot.hydrate(&env).unwrap(), battle);

        snapshot.prepare_counter = 9;
        assert!(matches!(
            snapshot.hydrate(&env),
            Err(SnapshotError::OutOfRange { field: "battle.prepare_counter", .. })
        ));
    }
}
