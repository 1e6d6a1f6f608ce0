//! Commands accepted in every state, checked before the transition table.
use std::str::FromStr;

use super::guard::{Authority, Guard};
use super::state::GameState;
use super::transition;
use super::{EngineError, GameMachine, states};
use crate::battle::Side;
use crate::env::Env;

/// State-independent commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum GenericCommand {
    Help,
    Restart,
    Stats,
    Inventory,
    Floor,
    Records,
    DebugFloor,
    DebugLevel,
    DebugItem,
    DebugHeal,
}

impl GenericCommand {
    pub fn parse(command: &str) -> Option<Self> {
        Self::from_str(command).ok()
    }

    pub const fn guard(self) -> Guard {
        match self {
            Self::DebugFloor | Self::DebugLevel | Self::DebugItem | Self::DebugHeal => Guard::Admin,
            _ => Guard::Any,
        }
    }
}

const ALWAYS_AVAILABLE: &str = "Always available: help, restart, stats, inventory, floor, records.";

impl GameMachine {
    /// Run a generic command. Admin-only commands from a user produce no
    /// output at all.
    pub(super) fn run_generic(
        &mut self,
        env: &Env<'_>,
        command: GenericCommand,
        args: &[String],
        authority: Authority,
    ) -> Result<(), EngineError> {
        if !command.guard().permits(authority) {
            return Ok(());
        }
        let tables = env.tables();
        match command {
            GenericCommand::Help => {
                let commands = transition::user_commands(self.state.kind());
                if !commands.is_empty() {
                    self.ctx.say(format!("Commands: {}", commands.join(", ")));
                }
                self.ctx.say(ALWAYS_AVAILABLE);
            }
            GenericCommand::Restart => {
                self.ctx.reset(tables);
                self.state = GameState::Start;
                states::enter(&self.state, &mut self.ctx, env)?;
            }
            GenericCommand::Stats => {
                let lines = match &self.ctx.familiar {
                    Some(familiar) => familiar.describe(&tables.levels),
                    None => vec!["You don't have a familiar yet.".to_owned()],
                };
                self.ctx.say_all(lines);
            }
            GenericCommand::Inventory => {
                let lines = self.ctx.inventory.describe();
                self.ctx.say_all(lines);
            }
            GenericCommand::Floor => {
                let line = format!("You are on floor {} of {}.", self.ctx.floor, tables.max_floor);
                self.ctx.say(line);
            }
            GenericCommand::Records => {
                let lines = self.ctx.counters.describe();
                self.ctx.say_all(lines);
            }
            GenericCommand::DebugFloor => {
                let Some(floor) = number(args) else {
                    self.ctx.say("Usage: debug_floor <floor>");
                    return Ok(());
                };
                self.ctx.move_to_floor(floor.min(tables.max_floor));
                let line = format!("You are now on floor {}.", self.ctx.floor);
                self.ctx.say(line);
            }
            GenericCommand::DebugLevel => {
                let Some(level) = number(args) else {
                    self.ctx.say("Usage: debug_level <level>");
                    return Ok(());
                };
                let Some(familiar) = self.ctx.familiar.as_mut() else {
                    self.ctx.say("You don't have a familiar yet.");
                    return Ok(());
                };
                familiar.set_level(level, &tables.levels);
                let line = format!("{} is now level {}.", familiar.name(), familiar.level());
                self.ctx.say(line);
            }
            GenericCommand::DebugItem => {
                let name = args.join(" ");
                let line = match env.item(&name) {
                    Ok(item) => {
                        let added = item.name.clone();
                        match self.ctx.inventory.push(item) {
                            Ok(_) => format!("Added {added} to your inventory."),
                            Err(_) => "Your inventory is full.".to_owned(),
                        }
                    }
                    Err(_) => format!("Unknown item '{name}'."),
                };
                self.ctx.say(line);
            }
            GenericCommand::DebugHeal => {
                let Some(familiar) = self.ctx.familiar.as_mut() else {
                    self.ctx.say("You don't have a familiar yet.");
                    return Ok(());
                };
                let subject = familiar.subject(Side::Player);
                familiar.restore_all();
                let mut lines = vec![format!("{} fully restored.", subject.is())];
                for kind in familiar.statuses_mut().clear_debuffs() {
                    lines.push(kind.cleared_line(&subject));
                }
                self.ctx.say_all(lines);
            }
        }
        Ok(())
    }
}

fn number(args: &[String]) -> Option<u32> {
    args.first().and_then(|arg| arg.parse().ok())
}
