//! Session worker that owns every loaded [`GameMachine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! against the player's machine, persists the result and publishes
//! timer-driven responses as [`SessionEvent`]s.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tower_core::{
    Authority, ContentRegistry, Env, GameError, GameMachine, MachineSnapshot, PcgRng,
};
use tracing::{debug, error, info, warn};

use crate::api::{APOLOGY, Result, SessionEvent};
use crate::clock::Clock;
use crate::repository::SaveRepository;
use crate::scheduler::ParticipationBook;

/// Command injected for the player picked by the timer.
const GENERATE: &str = "generate";

/// One player command.
#[derive(Clone, Debug)]
pub struct Request {
    pub player_id: String,
    pub player_name: String,
    pub command: String,
    pub args: Vec<String>,
    pub authority: Authority,
}

/// Commands that can be sent to the session worker
pub enum Command {
    /// Run a player command.
    Handle {
        request: Request,
        reply: oneshot::Sender<Result<Vec<String>>>,
    },
    /// Pick one eligible player and generate an event for them.
    Tick {
        reply: Option<oneshot::Sender<Option<String>>>,
    },
    /// Query a player's snapshot (read-only).
    Snapshot {
        player_id: String,
        reply: oneshot::Sender<Result<Option<MachineSnapshot>>>,
    },
    /// Forget a player entirely.
    Remove {
        player_id: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    Shutdown,
}

/// Background task that processes session commands.
pub struct SessionWorker {
    registry: Arc<ContentRegistry>,
    repository: Arc<dyn SaveRepository>,
    clock: Arc<dyn Clock>,
    sessions: HashMap<String, GameMachine>,
    participation: ParticipationBook,
    scheduler_rng: PcgRng,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionWorker {
    pub fn new(
        registry: Arc<ContentRegistry>,
        repository: Arc<dyn SaveRepository>,
        clock: Arc<dyn Clock>,
        participation: ParticipationBook,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            registry,
            repository,
            clock,
            sessions: HashMap::new(),
            participation,
            scheduler_rng: PcgRng::from_seed(rand::random()),
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        self.load_saved_sessions();
        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }
        info!(sessions = self.sessions.len(), "Session worker stopped");
    }

    /// Returns `false` once the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Handle { request, reply } => {
                let result = self.handle_request(request);
                if reply.send(result).is_err() {
                    debug!("Handle reply channel closed (caller dropped)");
                }
            }
            Command::Tick { reply } => {
                let chosen = self.handle_tick();
                if let Some(reply) = reply {
                    if reply.send(chosen).is_err() {
                        debug!("Tick reply channel closed (caller dropped)");
                    }
                }
            }
            Command::Snapshot { player_id, reply } => {
                let result = self
                    .ensure_loaded(&player_id, None)
                    .map(|loaded| loaded.then(|| self.sessions[&player_id].snapshot()));
                if reply.send(result).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Remove { player_id, reply } => {
                let result = self.remove(&player_id);
                if reply.send(result).is_err() {
                    debug!("Remove reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Make sure `player_id` has a machine in memory.
    ///
    /// With a `name`, a missing session is created; without one, only an
    /// existing save is loaded. Returns whether a machine is now loaded.
    fn ensure_loaded(&mut self, player_id: &str, name: Option<&str>) -> Result<bool> {
        if self.sessions.contains_key(player_id) {
            return Ok(true);
        }

        let restored = match self.repository.load(player_id) {
            Ok(Some(snapshot)) => self.restore(snapshot),
            Ok(None) => None,
            Err(err) if err.is_corrupt() => {
                warn!(player = player_id, "Discarding corrupt save: {}", err);
                None
            }
            Err(err) => return Err(err.into()),
        };

        let machine = match (restored, name) {
            (Some(machine), _) => {
                info!(player = player_id, state = %machine.state().kind(), "Session restored");
                machine
            }
            (None, Some(name)) => {
                info!(player = player_id, "New session");
                let env = Env::from_registry(&self.registry);
                GameMachine::new(player_id, name, rand::random(), &env)
            }
            (None, None) => return Ok(false),
        };
        self.sessions.insert(player_id.to_owned(), machine);
        Ok(true)
    }

    /// Rebuild a machine from a save, or `None` when it no longer fits the
    /// loaded content.
    fn restore(&self, snapshot: MachineSnapshot) -> Option<GameMachine> {
        let player_id = snapshot.player_id.clone();
        let env = Env::from_registry(&self.registry);
        match GameMachine::restore(snapshot, &env) {
            Ok(machine) => Some(machine),
            Err(err) => {
                warn!(
                    player = %player_id,
                    code = err.error_code(),
                    "Discarding unreadable save: {}",
                    err
                );
                None
            }
        }
    }

    /// Bring every stored session into memory so the timer can reach players
    /// who have not sent a command since the runtime started.
    ///
    /// Saves that cannot be read are skipped; they are replaced on the
    /// player's next command.
    fn load_saved_sessions(&mut self) {
        let stored = match self.repository.list_players() {
            Ok(stored) => stored,
            Err(err) => {
                warn!("Failed to list saved sessions: {}", err);
                return;
            }
        };

        for key in stored {
            let snapshot = match self.repository.load(&key) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => continue,
                Err(err) => {
                    warn!(save = %key, "Skipping save: {}", err);
                    continue;
                }
            };
            let player_id = snapshot.player_id.clone();
            if let Some(machine) = self.restore(snapshot) {
                self.sessions.insert(player_id, machine);
            }
        }
        info!(sessions = self.sessions.len(), "Saved sessions loaded");
    }

    fn handle_request(&mut self, request: Request) -> Result<Vec<String>> {
        self.ensure_loaded(&request.player_id, Some(&request.player_name))?;
        let env = Env::from_registry(&self.registry);
        let Some(machine) = self.sessions.get_mut(&request.player_id) else {
            return Ok(Vec::new());
        };

        let before = machine.clone();
        let result = machine.on_action(&env, &request.command, &request.args, request.authority);
        match result {
            Ok(lines) => {
                debug!(
                    player = %request.player_id,
                    command = %request.command,
                    state = %machine.state().kind(),
                    lines = lines.len(),
                    "Command resolved"
                );
                if let Err(err) = self.repository.save(&machine.snapshot()) {
                    error!(player = %request.player_id, "Failed to save session: {}", err);
                }
                Ok(lines)
            }
            Err(err) => {
                error!(
                    player = %request.player_id,
                    command = %request.command,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "Engine invariant violated: {}",
                    err
                );
                *machine = before;
                Ok(vec![APOLOGY.to_owned()])
            }
        }
    }

    fn remove(&mut self, player_id: &str) -> Result<bool> {
        let loaded = self.sessions.remove(player_id).is_some();
        self.participation.remove(player_id);
        self.repository.delete(player_id)?;
        info!(player = player_id, "Session removed");
        Ok(loaded)
    }

    // ========================================================================
    // Timer
    // ========================================================================

    fn handle_tick(&mut self) -> Option<String> {
        let now = self.clock.now();
        self.participation.prune(now);

        let mut eligible: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, machine)| machine.is_started() && machine.is_waiting_for_event())
            .map(|(id, _)| id.clone())
            .collect();
        eligible.sort_unstable();

        let chosen = self
            .participation
            .pick(&eligible, now, &mut self.scheduler_rng)?
            .to_owned();
        self.participation.record(&chosen, now);

        let player_name = self
            .sessions
            .get(&chosen)
            .map(|machine| machine.player_name().to_owned())
            .unwrap_or_default();
        debug!(player = %chosen, eligible = eligible.len(), "Timer picked player");

        let request = Request {
            player_id: chosen.clone(),
            player_name,
            command: GENERATE.to_owned(),
            args: Vec::new(),
            authority: Authority::Admin,
        };
        match self.handle_request(request) {
            Ok(lines) if !lines.is_empty() => {
                let event = SessionEvent {
                    player_id: chosen.clone(),
                    lines,
                };
                if self.event_tx.send(event).is_err() {
                    debug!("No subscribers for session event");
                }
            }
            Ok(_) => {}
            Err(err) => error!(player = %chosen, "Timer event failed: {}", err),
        }
        Some(chosen)
    }
}
