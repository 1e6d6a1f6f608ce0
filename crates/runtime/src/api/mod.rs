//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or persistence.

pub mod errors;
pub mod events;
pub mod handle;

pub use errors::{APOLOGY, Result, RuntimeError};
pub use events::SessionEvent;
pub use handle::RuntimeHandle;
