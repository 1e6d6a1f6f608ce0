//! Terminal host for the tower.
//!
//! The binary wires a [`tower_runtime::Runtime`] to stdin and stdout. Each
//! input line becomes one command for the configured player; replies and
//! timer events for that player are printed as they arrive.

pub mod config;
mod console;
pub mod logging;

pub use config::ClientConfig;
pub use console::{Console, parse_line};
