//! Common error infrastructure for tower-core.
//!
//! Domain-specific errors (`EngineError`, `SnapshotError`, `SelectionError`,
//! `ActionBlocked`) live next to the code that raises them and implement
//! [`GameError`] so hosts can classify them uniformly.
//!
//! # Failure classes
//!
//! - **User-facing**: illegal command or failed precondition; never an `Err`,
//!   always a response line.
//! - **Invalid data**: corrupt snapshot or unknown content reference, raised at
//!   load time.
//! - **Invariant violation**: an engine bug, logged by the host and surfaced
//!   as a generic apology.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: the caller can retry with another action
/// - **Validation**: invalid input or data that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors indicating corrupted game state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: not enough MP, item not usable here
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown state name in a save, out-of-range level
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: pending action overwritten, state with no transitions
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - game state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tower-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
