//! The progression state machine.
//!
//! [`GameMachine`] owns one player's [`GameState`] and [`GameContext`]. Each
//! command is first matched against the [generic commands](generic), then
//! routed through the [transition table](transition). Entering a state may
//! queue exactly one follow-up, which is dispatched with admin authority in
//! the same call; the chain ends at a state that waits for the player, for
//! the event timer, or at the end of the run.

mod errors;
mod generic;
mod guard;
mod snapshot;
mod state;
mod states;
mod transition;


use std::collections::VecDeque;

pub use errors::EngineError;
pub use generic::GenericCommand;
pub use guard::{Authority, Guard};
pub use snapshot::{MachineSnapshot, StateSnapshot};
pub use state::{GameState, Resolution, StateKind};
pub use transition::{Rejection, Transition, find, kind_named, transitions, user_commands};

use crate::config::GameConfig;
use crate::env::Env;
use crate::state::{GameContext, PendingAction, SnapshotError};

const GAME_OVER_HINT: &str = "The game is over. Type restart to begin a new run.";
const UNKNOWN_COMMAND: &str = "Unknown command.";

/// One player's run: identity, current state and context.
#[derive(Clone, Debug)]
pub struct GameMachine {
    player_id: String,
    player_name: String,
    state: GameState,
    ctx: GameContext,
    last_responses: Vec<String>,
}

impl GameMachine {
    /// A fresh machine in the start state. Nothing is narrated until the
    /// first command.
    pub fn new(
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        seed: u64,
        env: &Env<'_>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            state: GameState::Start,
            ctx: GameContext::new(seed, env.tables()),
            last_responses: Vec::new(),
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    /// Lines produced by the last successful command.
    pub fn last_responses(&self) -> &[String] {
        &self.last_responses
    }

    pub fn is_started(&self) -> bool {
        self.state != GameState::Start
    }

    pub fn is_waiting_for_user_action(&self) -> bool {
        self.state.kind().waits_for_user()
    }

    pub fn is_waiting_for_event(&self) -> bool {
        self.state.kind().waits_for_event()
    }

    pub fn is_finished(&self) -> bool {
        self.state.kind().is_terminal()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Handle one command and every follow-up it triggers.
    ///
    /// Illegal or malformed commands are not errors: they produce response
    /// lines and leave the state unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on an engine defect (a state that stalls, a
    /// follow-up with no route, a runaway chain, missing content). The
    /// response buffer and any queued follow-up are discarded.
    pub fn on_action(
        &mut self,
        env: &Env<'_>,
        command: &str,
        args: &[String],
        authority: Authority,
    ) -> Result<Vec<String>, EngineError> {
        let command = command.trim().to_ascii_lowercase();
        let result = match GenericCommand::parse(&command) {
            Some(generic) => self.run_generic(env, generic, args, authority),
            None => self.dispatch(
                env,
                PendingAction {
                    command,
                    args: args.to_vec(),
                    authority,
                },
            ),
        };

        match result {
            Ok(()) => {
                let lines = self.ctx.responses.take();
                self.last_responses.clone_from(&lines);
                Ok(lines)
            }
            Err(err) => {
                self.ctx.responses.take();
                self.ctx.take_pending();
                Err(err)
            }
        }
    }

    /// Trampoline over the follow-up queue.
    fn dispatch(&mut self, env: &Env<'_>, first: PendingAction) -> Result<(), EngineError> {
        let mut queue = VecDeque::from([first]);
        let mut steps = 0usize;

        while let Some(action) = queue.pop_front() {
            steps += 1;
            if steps > GameConfig::MAX_CASCADE {
                return Err(EngineError::CascadeLimit {
                    limit: GameConfig::MAX_CASCADE,
                });
            }

            let kind = self.state.kind();
            if transitions(kind).is_empty() {
                if kind.is_terminal() {
                    self.ctx.say(GAME_OVER_HINT);
                    return Ok(());
                }
                return Err(EngineError::NoTransitions(kind));
            }

            let Some(transition) = find(kind, &action.command, action.authority) else {
                if steps > 1 {
                    return Err(EngineError::UnroutableFollowUp {
                        state: kind,
                        command: action.command,
                    });
                }
                self.ctx.say(UNKNOWN_COMMAND);
                return Ok(());
            };

            let next = match (transition.build)(&self.state, &action.args, &self.ctx, env) {
                Ok(next) => next,
                Err(rejection) => {
                    self.ctx.say_all(rejection.lines);
                    return Ok(());
                }
            };

            self.state = next;
            states::enter(&self.state, &mut self.ctx, env)?;

            match self.ctx.take_pending() {
                Some(follow_up) => queue.push_back(follow_up),
                None if self.state.kind().waits() => {}
                None => return Err(EngineError::Stalled(self.state.kind())),
            }
        }
        Ok(())
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            version: GameConfig::SAVE_VERSION,
            player_id: self.player_id.clone(),
            player_name: self.player_name.clone(),
            last_responses: self.last_responses.clone(),
            context: self.ctx.snapshot(),
            state: StateSnapshot::of(&self.state),
        }
    }

    /// Rebuild a machine from a snapshot, validating it against `env`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the version is not supported, content
    /// no longer resolves, or the state and context disagree.
    pub fn restore(snapshot: MachineSnapshot, env: &Env<'_>) -> Result<Self, SnapshotError> {
        if snapshot.version != GameConfig::SAVE_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: GameConfig::SAVE_VERSION,
            });
        }
        let ctx = snapshot.context.hydrate(env)?;
        let state = snapshot.state.hydrate(&ctx, env)?;
        if !state.kind().waits() {
            return Err(SnapshotError::Inconsistent("snapshot taken mid-cascade"));
        }
        Ok(Self {
            player_id: snapshot.player_id,
            player_name: snapshot.player_name,
            state,
            ctx,
            last_responses: snapshot.last_responses,
        })
    }
}
