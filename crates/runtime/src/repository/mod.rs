//! Repository layer for saved sessions.
//!
//! Repositories hold data that CHANGES during play: one
//! [`MachineSnapshot`](tower_core::MachineSnapshot) per player. Static content
//! (species, items, tables) comes from `tower-content`, never from here.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepo;
pub use traits::SaveRepository;
