//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns every loaded machine and executes commands one at
//! a time; the timer task only sends it `Tick` commands.

mod session;
mod timer;

pub use session::{Command, Request, SessionWorker};
pub use timer::spawn_timer;
