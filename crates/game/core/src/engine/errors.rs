//! Error types for the progression machine.
//!
//! Every variant here is an engine defect, never a player mistake: illegal
//! commands and failed preconditions are reported as response lines instead.

use super::StateKind;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::selection::SelectionError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("follow-up '{attempted}' generated while '{existing}' is still pending")]
    PendingActionOccupied { existing: String, attempted: String },

    #[error("state '{0}' has no transitions")]
    NoTransitions(StateKind),

    #[error("follow-up chain exceeded {limit} transitions")]
    CascadeLimit { limit: usize },

    #[error("state '{0}' neither waits nor generates a follow-up")]
    Stalled(StateKind),

    #[error("follow-up '{command}' has no transition from state '{state}'")]
    UnroutableFollowUp { state: StateKind, command: String },

    #[error("weight table '{0}' names an unknown event kind")]
    UnknownEventKind(String),

    #[error("state requires {0}")]
    MissingContext(&'static str),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Content(#[from] OracleError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Content(_) | Self::UnknownEventKind(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PendingActionOccupied { .. } => "ENGINE_PENDING_ACTION_OCCUPIED",
            Self::NoTransitions(_) => "ENGINE_NO_TRANSITIONS",
            Self::CascadeLimit { .. } => "ENGINE_CASCADE_LIMIT",
            Self::Stalled(_) => "ENGINE_STALLED",
            Self::UnroutableFollowUp { .. } => "ENGINE_UNROUTABLE_FOLLOW_UP",
            Self::UnknownEventKind(_) => "ENGINE_UNKNOWN_EVENT_KIND",
            Self::MissingContext(_) => "ENGINE_MISSING_CONTEXT",
            Self::Selection(_) => "ENGINE_SELECTION",
            Self::Content(_) => "ENGINE_CONTENT",
        }
    }
}
