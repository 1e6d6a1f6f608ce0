//! Runtime orchestration for tower sessions.
//!
//! This crate wires the deterministic rules of `tower-core` to the outside
//! world: it owns every player's [`tower_core::GameMachine`] inside a single
//! worker task, persists them through a [`SaveRepository`], and drives the
//! recurring event timer that injects `generate` commands. Consumers embed
//! [`Runtime`] and talk to it through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`repository`] persists machine snapshots
//! - [`clock`] and [`scheduler`] decide who the timer picks
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod clock;
pub mod config;
pub mod repository;
pub mod runtime;
pub mod scheduler;

mod workers;

pub use api::{APOLOGY, Result, RuntimeError, RuntimeHandle, SessionEvent};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RuntimeConfig;
pub use repository::{FileSaveRepository, InMemorySaveRepo, RepositoryError, SaveRepository};
pub use runtime::{Runtime, RuntimeBuilder};
pub use scheduler::ParticipationBook;
