//! Deterministic rules of the tower, shared by every host.
//!
//! `tower-core` owns units and their damage math, weighted selection, the
//! battle engine and the progression state machine. It performs no I/O: the
//! runtime feeds commands into a [`engine::GameMachine`] together with an
//! [`env::Env`] view over loaded content and forwards the response lines it
//! returns. With the `serde` feature a machine can be captured as a
//! [`engine::MachineSnapshot`] and restored with an identical random stream.
pub mod action;
pub mod battle;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod narration;
pub mod selection;
pub mod state;
pub mod unit;

#[cfg(test)]
mod testing;

pub use action::{ActionBlocked, BattleAction, UnitAction};
pub use battle::{BattleContext, BattleResult, Side};
pub use config::GameConfig;
pub use engine::{
    Authority, EngineError, GameMachine, GameState, MachineSnapshot, StateKind, StateSnapshot,
};
pub use env::{
    ContentError, ContentRegistry, Env, ItemTraits, OracleError, PcgRng, RandomSource,
    SpellTraits, Tables, UnitTraits,
};
pub use error::{ErrorSeverity, GameError};
pub use narration::{PARAGRAPH_BREAK, group_paragraphs};
pub use selection::{SelectionCategory, SelectionError, WeightFormula, WeightedOption};
pub use state::{ContextSnapshot, GameContext, Inventory, SnapshotError};
pub use unit::{Genus, StatusKind, Talent, Unit};
