//! Snapshot validation errors.
//!
//! Raised while rebuilding a machine from persisted data. Any of these means
//! the save is corrupt or refers to content that no longer exists; it is
//! never repaired silently.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};

/// A persisted snapshot failed validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Written by a format version this build does not read.
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The state name is not a key of the transition table.
    #[error("unknown state '{0}'")]
    UnknownState(String),

    /// A content reference does not resolve.
    #[error(transparent)]
    Content(#[from] OracleError),

    /// A numeric field is outside its legal range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u64 },

    /// A state field is missing or does not parse.
    #[error("invalid state field '{field}': {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// Fields contradict each other.
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(&'static str),
}

impl SnapshotError {
    pub fn out_of_range(field: &'static str, value: impl Into<u64>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }
}

impl GameError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion { .. } => "SNAPSHOT_UNSUPPORTED_VERSION",
            Self::UnknownState(_) => "SNAPSHOT_UNKNOWN_STATE",
            Self::Content(_) => "SNAPSHOT_UNKNOWN_CONTENT",
            Self::OutOfRange { .. } => "SNAPSHOT_OUT_OF_RANGE",
            Self::InvalidField { .. } => "SNAPSHOT_INVALID_FIELD",
            Self::Inconsistent(_) => "SNAPSHOT_INCONSISTENT",
        }
    }
}
