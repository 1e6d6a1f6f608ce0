//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in save for '{player_id}': {message}")]
    Json { player_id: String, message: String },
}

impl RepositoryError {
    /// Whether the stored data itself is unreadable, as opposed to the
    /// storage being unavailable.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Json { .. })
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
