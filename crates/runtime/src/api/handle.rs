//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving sessions or streaming timer events.
use tokio::sync::{broadcast, mpsc, oneshot};

use tower_core::{Authority, MachineSnapshot};

use super::errors::{Result, RuntimeError};
use super::events::SessionEvent;
use crate::workers::{Command, Request};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    /// Run one command for a player and return the narrated lines.
    ///
    /// The player's session is loaded from the repository (or created) on
    /// first use and saved after the command resolves.
    pub async fn handle(
        &self,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
        authority: Authority,
    ) -> Result<Vec<String>> {
        let request = Request {
            player_id: player_id.into(),
            player_name: player_name.into(),
            command: command.into(),
            args,
            authority,
        };
        self.request(|reply| Command::Handle { request, reply })
            .await?
    }

    /// Current snapshot of a player's session, loading it if needed.
    pub async fn snapshot(&self, player_id: impl Into<String>) -> Result<Option<MachineSnapshot>> {
        let player_id = player_id.into();
        self.request(|reply| Command::Snapshot { player_id, reply })
            .await?
    }

    /// Drop a player's session, save and scheduling entry.
    ///
    /// Returns whether a session was loaded.
    pub async fn remove_player(&self, player_id: impl Into<String>) -> Result<bool> {
        let player_id = player_id.into();
        self.request(|reply| Command::Remove { player_id, reply })
            .await?
    }

    /// Run one timer tick now. Returns the player who got an event.
    pub async fn tick(&self) -> Result<Option<String>> {
        self.request(|reply| Command::Tick { reply: Some(reply) })
            .await
    }

    /// Subscribe to timer-driven session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) async fn stop(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
