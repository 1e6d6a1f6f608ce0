//! Mutable per-player game data shared by every state.
//!
//! The progression machine holds exactly one [`GameContext`]. States read and
//! mutate it on entry, push narration into its response buffer and may
//! generate one follow-up command through [`GameContext::generate`].
mod error;
mod inventory;

use std::sync::Arc;

pub use error::SnapshotError;
pub use inventory::Inventory;

use crate::action::ActionContext;
use crate::battle::{BattleContext, BattleSnapshot, Side};
use crate::config::GameConfig;
use crate::engine::{Authority, EngineError};
use crate::env::{Env, ItemTraits, PcgRng, Tables};
use crate::narration::PARAGRAPH_BREAK;
use crate::selection::{
    PenaltyBook, SelectionCategory, SelectionError, WeightContext, WeightedOption, select,
};
use crate::unit::{Unit, UnitSnapshot};

// ============================================================================
// Pending follow-up
// ============================================================================

/// A command generated by a state, dispatched before control returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub command: String,
    pub args: Vec<String>,
    pub authority: Authority,
}

// ============================================================================
// Responses
// ============================================================================

/// Ordered narration buffer with paragraph breaks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Responses {
    lines: Vec<String>,
}

impl Responses {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Start a new paragraph. Consecutive or leading breaks collapse.
    pub fn paragraph(&mut self) {
        match self.lines.last() {
            None => {}
            Some(last) if last == PARAGRAPH_BREAK => {}
            Some(_) => self.lines.push(PARAGRAPH_BREAK.to_owned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drain the buffer, dropping a trailing break.
    pub fn take(&mut self) -> Vec<String> {
        let mut lines = std::mem::take(&mut self.lines);
        while lines.last().is_some_and(|line| line == PARAGRAPH_BREAK) {
            lines.pop();
        }
        lines
    }
}

// ============================================================================
// Counters
// ============================================================================

/// Run statistics reported by the `records` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counters {
    pub events: u32,
    pub battles_won: u32,
    pub turns: u32,
    pub highest_floor: u32,
}

impl Counters {
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("Highest floor: {}", self.highest_floor),
            format!("Battles won: {}", self.battles_won),
            format!("Events seen: {}", self.events),
            format!("Turns fought: {}", self.turns),
        ]
    }
}

// ============================================================================
// Context
// ============================================================================

/// Everything a player's run carries between commands.
#[derive(Clone, Debug)]
pub struct GameContext {
    pub floor: u32,
    pub inventory: Inventory,
    pub familiar: Option<Unit>,
    pub battle: Option<BattleContext>,
    /// Item found or offered by the current event.
    pub item_buffer: Option<Arc<ItemTraits>>,
    /// Monster or wild familiar met by the current event.
    pub unit_buffer: Option<Unit>,
    pub rng: PcgRng,
    pub counters: Counters,
    pub penalties: PenaltyBook,
    pub responses: Responses,
    pending: Option<PendingAction>,
}

impl GameContext {
    pub fn new(seed: u64, tables: &Tables) -> Self {
        Self {
            floor: 1,
            inventory: Inventory::new(tables.inventory_capacity),
            familiar: None,
            battle: None,
            item_buffer: None,
            unit_buffer: None,
            rng: PcgRng::from_seed(seed),
            counters: Counters {
                highest_floor: 1,
                ..Counters::default()
            },
            penalties: PenaltyBook::default(),
            responses: Responses::default(),
            pending: None,
        }
    }

    /// Start a new run, keeping only the random stream.
    pub fn reset(&mut self, tables: &Tables) {
        let rng = self.rng;
        *self = Self {
            rng,
            ..Self::new(0, tables)
        };
    }

    // ========================================================================
    // Follow-ups
    // ========================================================================

    /// Queue `command` for dispatch with admin authority once the current
    /// state has been entered.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PendingActionOccupied`] when a follow-up is
    /// already queued.
    pub fn generate(&mut self, command: &str, args: Vec<String>) -> Result<(), EngineError> {
        if let Some(existing) = &self.pending {
            return Err(EngineError::PendingActionOccupied {
                existing: existing.command.clone(),
                attempted: command.to_owned(),
            });
        }
        self.pending = Some(PendingAction {
            command: command.to_owned(),
            args,
            authority: Authority::Admin,
        });
        Ok(())
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    // ========================================================================
    // Narration
    // ========================================================================

    pub fn say(&mut self, line: impl Into<String>) {
        self.responses.push(line);
    }

    pub fn say_all<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.responses.extend(lines);
    }

    pub fn paragraph(&mut self) {
        self.responses.paragraph();
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub fn familiar_level(&self) -> u32 {
        self.familiar.as_ref().map_or(1, Unit::level)
    }

    pub fn weight_context(&self) -> WeightContext {
        WeightContext {
            floor: self.floor,
            level: self.familiar_level(),
        }
    }

    /// Draw one option name from `options`, advancing the category's
    /// penalty timers.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` for an empty or all-zero pool.
    pub fn select(
        &mut self,
        category: SelectionCategory,
        options: &[WeightedOption],
    ) -> Result<String, SelectionError> {
        let ctx = self.weight_context();
        let timers = self.penalties.timers_mut(category);
        select(options, &ctx, timers, &mut self.rng).map(|option| option.name.clone())
    }

    /// Resolve actions for `performer` against the current battle, if any.
    ///
    /// Returns `None` before a familiar has been chosen.
    pub fn action_context<'a>(
        &'a mut self,
        performer: Side,
        env: Env<'a>,
    ) -> Option<ActionContext<'a>> {
        let familiar = self.familiar.as_mut()?;
        Some(ActionContext::new(
            performer,
            familiar,
            self.battle.as_mut(),
            &mut self.inventory,
            env,
            &mut self.rng,
        ))
    }

    pub fn move_to_floor(&mut self, floor: u32) {
        self.floor = floor.max(1);
        self.counters.highest_floor = self.counters.highest_floor.max(self.floor);
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            floor: self.floor,
            inventory: self.inventory.names(),
            inventory_capacity: self.inventory.capacity(),
            familiar: self.familiar.as_ref().map(Unit::snapshot),
            battle: self.battle.as_ref().map(BattleContext::snapshot),
            item_buffer: self.item_buffer.as_ref().map(|item| item.name.clone()),
            unit_buffer: self.unit_buffer.as_ref().map(Unit::snapshot),
            rng: self.rng,
            counters: self.counters,
            penalties: self.penalties.clone(),
        }
    }
}

/// Persisted form of a [`GameContext`]. Content is referenced by name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextSnapshot {
    pub floor: u32,
    pub inventory: Vec<String>,
    pub inventory_capacity: usize,
    pub familiar: Option<UnitSnapshot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub battle: Option<BattleSnapshot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub item_buffer: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_buffer: Option<UnitSnapshot>,
    pub rng: PcgRng,
    #[cfg_attr(feature = "serde", serde(default))]
    pub counters: Counters,
    #[cfg_attr(feature = "serde", serde(default))]
    pub penalties: PenaltyBook,
}

impl ContextSnapshot {
    /// Rebuild the context, re-resolving content and re-checking ranges.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` on unknown content or out-of-range values.
    pub fn hydrate(&self, env: &Env<'_>) -> Result<GameContext, SnapshotError> {
        let tables = env.tables();
        if !(1..=tables.max_floor).contains(&self.floor) {
            return Err(SnapshotError::out_of_range("context.floor", self.floor));
        }
        if !(1..=GameConfig::MAX_INVENTORY_SLOTS).contains(&self.inventory_capacity) {
            return Err(SnapshotError::out_of_range(
                "context.inventory_capacity",
                self.inventory_capacity as u64,
            ));
        }
        if self.inventory.len() > self.inventory_capacity {
            return Err(SnapshotError::out_of_range(
                "context.inventory",
                self.inventory.len() as u64,
            ));
        }
        let mut inventory = Inventory::new(self.inventory_capacity);
        for name in &self.inventory {
            inventory
                .push(env.item(name)?)
                .map_err(|_| SnapshotError::Inconsistent("inventory overflow"))?;
        }
        if self.battle.is_some() && self.familiar.is_none() {
            return Err(SnapshotError::Inconsistent("battle without a familiar"));
        }

        Ok(GameContext {
            floor: self.floor,
            inventory,
            familiar: self
                .familiar
                .as_ref()
                .map(|unit| unit.hydrate(env))
                .transpose()?,
            battle: self
                .battle
                .as_ref()
                .map(|battle| battle.hydrate(env))
                .transpose()?,
            item_buffer: self
                .item_buffer
                .as_deref()
                .map(|name| env.item(name))
                .transpose()?,
            unit_buffer: self
                .unit_buffer
                .as_ref()
                .map(|unit| unit.hydrate(env))
                .transpose()?,
            rng: self.rng,
            counters: self.counters,
            penalties: self.penalties.clone(),
            responses: Responses::default(),
            pending: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::RandomSource;
    use crate::testing::{fixture_registry, unit};

    #[test]
    fn second_follow_up_is_an_invariant_violation() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ctx = GameContext::new(1, env.tables());
        ctx.generate("wait", Vec::new()).unwrap();
        let err = ctx.generate("generate", Vec::new()).unwrap_err();
        assert!(matches!(err, EngineError::PendingActionOccupied { .. }));

        let pending = ctx.take_pending().unwrap();
        assert_eq!(pending.command, "wait");
        assert_eq!(pending.authority, Authority::Admin);
        assert!(ctx.generate("generate", Vec::new()).is_ok());
    }

    #[test]
    fn responses_collapse_breaks() {
        let mut responses = Responses::default();
        responses.paragraph();
        responses.push("a");
        responses.paragraph();
        responses.paragraph();
        responses.push("b");
        responses.paragraph();
        assert_eq!(responses.take(), vec!["a", PARAGRAPH_BREAK, "b"]);
        assert!(responses.is_empty());
    }

    #[test]
    fn rng_stream_survives_a_snapshot() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ctx = GameContext::new(42, env.tables());
        ctx.familiar = Some(unit(&env, "Ember", 2));
        ctx.inventory.push(env.item("Potion").unwrap()).unwrap();
        for _ in 0..5 {
            ctx.rng.next_u32();
        }

        let mut restored = ctx.snapshot().hydrate(&env).unwrap();
        let expected: Vec<u32> = (0..16).map(|_| ctx.rng.next_u32()).collect();
        let actual: Vec<u32> = (0..16).map(|_| restored.rng.next_u32()).collect();
        assert_eq!(expected, actual);
        assert_eq!(restored.inventory.names(), vec!["Potion"]);
    }

    #[test]
    fn hydrate_rejects_bad_ranges_and_content() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let ctx = GameContext::new(1, env.tables());

        let mut snapshot = ctx.snapshot();
        snapshot.floor = 0;
        assert!(matches!(
            snapshot.hydrate(&env),
            Err(SnapshotError::OutOfRange { field: "context.floor", .. })
        ));

        let mut snapshot = ctx.snapshot();
        snapshot.inventory = vec!["Philosopher's Stone".to_owned()];
        assert!(matches!(snapshot.hydrate(&env), Err(SnapshotError::Content(_))));

        let mut snapshot = ctx.snapshot();
        snapshot.inventory_capacity = 2;
        snapshot.inventory = vec!["Potion".into(), "Potion".into(), "Potion".into()];
        assert!(snapshot.hydrate(&env).is_err());
    }
}
