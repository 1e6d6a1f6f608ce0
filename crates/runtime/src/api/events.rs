//! Messages published outside of a request/response exchange.
use serde::{Deserialize, Serialize};

/// Lines produced for a player by a timer-injected command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub player_id: String,
    pub lines: Vec<String>,
}
