//! Content lookup and validation errors.

use crate::error::{ErrorSeverity, GameError};

/// A name that does not resolve in the loaded content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("unit '{0}' not found")]
    UnitNotFound(String),

    #[error("spell '{0}' not found")]
    SpellNotFound(String),

    #[error("ability '{0}' not found")]
    AbilityNotFound(String),

    #[error("item '{0}' not found")]
    ItemNotFound(String),

    #[error("trap '{0}' not found")]
    TrapNotFound(String),

    #[error("character '{0}' not found")]
    CharacterNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            UnitNotFound(_) => "ORACLE_UNIT_NOT_FOUND",
            SpellNotFound(_) => "ORACLE_SPELL_NOT_FOUND",
            AbilityNotFound(_) => "ORACLE_ABILITY_NOT_FOUND",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            TrapNotFound(_) => "ORACLE_TRAP_NOT_FOUND",
            CharacterNotFound(_) => "ORACLE_CHARACTER_NOT_FOUND",
        }
    }
}

/// Inconsistency found while validating a [`ContentRegistry`](super::ContentRegistry).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("{owner} references unknown {kind} '{name}'")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        name: String,
    },

    #[error("weight table '{0}' has no option with a positive weight")]
    DegenerateWeights(&'static str),

    #[error("weight table '{table}' names unknown option '{name}'")]
    UnknownOption { table: &'static str, name: String },

    #[error("invalid table value: {0}")]
    InvalidTable(String),
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownReference { .. } => "CONTENT_UNKNOWN_REFERENCE",
            Self::DegenerateWeights(_) => "CONTENT_DEGENERATE_WEIGHTS",
            Self::UnknownOption { .. } => "CONTENT_UNKNOWN_OPTION",
            Self::InvalidTable(_) => "CONTENT_INVALID_TABLE",
        }
    }
}
