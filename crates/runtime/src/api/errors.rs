//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and content
//! loading so clients can bubble them up with consistent context. Engine
//! defects never show up here: the worker logs them and answers the player
//! with an apology instead.
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Line sent to the player when the engine hits a defect.
pub const APOLOGY: &str = "Something went wrong on our side. Please try that again.";

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to load content from {path}")]
    Content {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
