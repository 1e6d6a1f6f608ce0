//! The transition table: (state kind, command) to the next state.
//!
//! Each entry carries a [`Guard`] and a builder. Builders only read the
//! context; they validate the command's arguments and either produce the
//! target state or a [`Rejection`] shown to the player, in which case the
//! machine stays where it is.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::guard::{Authority, Guard};
use super::state::{GameState, Resolution, StateKind};
use crate::action::{
    ActionBlocked, ActionView, BattleAction, CastSpell, PhysicalAttack, UnitAction, UseAbility,
    UseItem,
};
use crate::battle::Side;
use crate::env::Env;
use crate::state::GameContext;

/// Builds the target state from the command arguments.
pub type Builder =
    fn(&GameState, &[String], &GameContext, &Env<'_>) -> Result<GameState, Rejection>;

/// A user-facing refusal. The state does not change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub lines: Vec<String>,
}

impl Rejection {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }
}

impl From<ActionBlocked> for Rejection {
    fn from(blocked: ActionBlocked) -> Self {
        Self::new(blocked.to_string())
    }
}

pub struct Transition {
    pub command: &'static str,
    /// How the command is shown by `help`.
    pub usage: &'static str,
    pub guard: Guard,
    pub build: Builder,
}

impl Transition {
    const fn any(command: &'static str, build: Builder) -> Self {
        Self {
            command,
            usage: command,
            guard: Guard::Any,
            build,
        }
    }

    const fn admin(command: &'static str, build: Builder) -> Self {
        Self {
            command,
            usage: command,
            guard: Guard::Admin,
            build,
        }
    }

    const fn with_usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }
}

impl core::fmt::Debug for Transition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Transition")
            .field("command", &self.command)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Entries registered for `kind`; empty for the terminal state.
pub fn transitions(kind: StateKind) -> &'static [Transition] {
    TABLE.get(&kind).map_or(&[], Vec::as_slice)
}

/// The entry for `command` that `authority` may trigger.
pub fn find(kind: StateKind, command: &str, authority: Authority) -> Option<&'static Transition> {
    transitions(kind)
        .iter()
        .find(|transition| transition.command == command && transition.guard.permits(authority))
}

/// State kind whose snake_case name is `name`, if the table knows it.
pub fn kind_named(name: &str) -> Option<StateKind> {
    TABLE
        .keys()
        .copied()
        .find(|kind| kind.as_ref() == name)
        .or_else(|| (StateKind::GameOver.as_ref() == name).then_some(StateKind::GameOver))
}

/// Usages a player may type in `kind`.
pub fn user_commands(kind: StateKind) -> Vec<&'static str> {
    transitions(kind)
        .iter()
        .filter(|transition| transition.guard == Guard::Any)
        .map(|transition| transition.usage)
        .collect()
}

// ============================================================================
// Table
// ============================================================================

static TABLE: LazyLock<BTreeMap<StateKind, Vec<Transition>>> = LazyLock::new(|| {
    use StateKind as K;

    let mut table = BTreeMap::new();
    table.insert(
        K::Start,
        vec![Transition::any("start", |_, _, _, _| Ok(GameState::Initialize))],
    );
    table.insert(
        K::Initialize,
        vec![Transition::any("choose", choose_familiar).with_usage("choose <familiar>")],
    );
    table.insert(
        K::ChooseFamiliar,
        vec![Transition::admin("enter", |_, _, _, _| {
            Ok(GameState::EnterTower { ascend: false })
        })],
    );
    table.insert(
        K::EnterTower,
        vec![
            Transition::admin("wait", |_, _, _, _| Ok(GameState::WaitForEvent)),
            Transition::admin("victory", |_, _, _, _| Ok(GameState::GameOver { won: true })),
        ],
    );
    table.insert(
        K::WaitForEvent,
        vec![
            Transition::admin("generate", |_, _, _, _| Ok(GameState::GenerateEvent)),
            Transition::any("use", |_, args, ctx, _| {
                let slot = check_item(args, ctx)?;
                Ok(GameState::UseItem { slot })
            })
            .with_usage("use <slot>"),
        ],
    );
    table.insert(
        K::UseItem,
        vec![Transition::admin("wait", |_, _, _, _| Ok(GameState::WaitForEvent))],
    );
    table.insert(
        K::GenerateEvent,
        vec![
            Transition::admin("battle", |_, _, _, _| Ok(GameState::StartBattle)),
            Transition::admin("item", |_, _, _, _| Ok(GameState::ItemEvent)),
            Transition::admin("trap", |_, _, _, _| Ok(GameState::TrapEvent)),
            Transition::admin("character", |_, _, _, _| Ok(GameState::CharacterEvent)),
            Transition::admin("elevator", |_, _, _, _| Ok(GameState::ElevatorEvent)),
            Transition::admin("familiar", |_, _, _, _| Ok(GameState::FamiliarEvent)),
        ],
    );

    // Battle
    table.insert(
        K::StartBattle,
        vec![Transition::admin("prepare", |_, _, _, _| {
            Ok(GameState::PreparePhase { turn_used: false })
        })],
    );
    table.insert(
        K::PreparePhase,
        vec![
            Transition::any("approach", |_, _, _, _| Ok(GameState::Approach)),
            Transition::any("use", |_, args, ctx, _| {
                let slot = check_item(args, ctx)?;
                Ok(GameState::PrepareItem { slot })
            })
            .with_usage("use <slot>"),
            Transition::any("wait", |_, _, _, _| {
                Ok(GameState::PreparePhase { turn_used: true })
            }),
            Transition::any("flee", |_, _, _, _| Ok(GameState::Flee)),
            Transition::admin("fight", |_, _, _, _| Ok(GameState::BattlePhase)),
        ],
    );
    table.insert(
        K::PrepareItem,
        vec![
            Transition::admin("prepare", |_, _, _, _| {
                Ok(GameState::PreparePhase { turn_used: true })
            }),
            Transition::admin("finish", |_, _, _, _| Ok(GameState::BattleFinished)),
        ],
    );
    table.insert(
        K::Approach,
        vec![Transition::admin("fight", |_, _, _, _| Ok(GameState::BattlePhase))],
    );
    table.insert(
        K::Flee,
        vec![
            Transition::admin("finish", |_, _, _, _| Ok(GameState::BattleFinished)),
            Transition::admin("fight", |_, _, _, _| Ok(GameState::BattlePhase)),
            Transition::admin("next", |_, _, _, _| Ok(GameState::BattlePhase)),
        ],
    );
    table.insert(
        K::BattlePhase,
        vec![
            Transition::admin("player", |_, _, _, _| Ok(GameState::PlayerTurn)),
            Transition::admin("enemy", |_, _, _, _| Ok(GameState::EnemyTurn)),
            Transition::admin("confused", |_, _, _, _| Ok(GameState::ConfusedTurn)),
            Transition::admin("skip", |_, _, _, _| Ok(GameState::SkipTurn)),
            Transition::admin("finish", |_, _, _, _| Ok(GameState::BattleFinished)),
        ],
    );
    table.insert(
        K::PlayerTurn,
        vec![
            Transition::any("attack", |_, _, ctx, _| {
                player_action(ctx, BattleAction::Attack(PhysicalAttack))
            }),
            Transition::any("cast", |_, _, ctx, _| {
                player_action(ctx, BattleAction::Cast(CastSpell))
            }),
            Transition::any("ability", |_, _, ctx, _| {
                player_action(ctx, BattleAction::Ability(UseAbility))
            }),
            Transition::any("use", |_, args, ctx, _| {
                let slot = parse_slot(args, ctx)?;
                player_action(ctx, BattleAction::Item(UseItem::new(slot)))
            })
            .with_usage("use <slot>"),
            Transition::any("flee", |_, _, _, _| Ok(GameState::Flee)),
        ],
    );
    for kind in [K::PlayerAction, K::EnemyTurn, K::ConfusedTurn, K::SkipTurn] {
        table.insert(
            kind,
            vec![
                Transition::admin("next", |_, _, _, _| Ok(GameState::BattlePhase)),
                Transition::admin("finish", |_, _, _, _| Ok(GameState::BattleFinished)),
            ],
        );
    }
    table.insert(
        K::BattleFinished,
        vec![
            Transition::admin("died", |_, _, _, _| Ok(GameState::GameOver { won: false })),
            Transition::admin("end", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );

    // Events
    table.insert(
        K::ItemEvent,
        vec![
            Transition::any("take", take_item).with_usage("take [slot]"),
            Transition::any("leave", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );
    table.insert(
        K::TrapEvent,
        vec![
            Transition::admin("finish", |_, _, _, _| Ok(GameState::EventFinished)),
            Transition::admin("battle", |_, _, _, _| Ok(GameState::StartBattle)),
        ],
    );
    table.insert(
        K::CharacterEvent,
        vec![
            Transition::admin("trader", |_, args, _, _| {
                Ok(GameState::Trader {
                    name: character_name(args),
                })
            }),
            Transition::admin("healer", |_, args, _, _| {
                Ok(GameState::Healer {
                    name: character_name(args),
                })
            }),
            Transition::admin("sage", |_, args, _, _| {
                Ok(GameState::Sage {
                    name: character_name(args),
                })
            }),
        ],
    );
    table.insert(
        K::Trader,
        vec![
            Transition::any("trade", trade_item).with_usage("trade <slot>"),
            Transition::any("leave", |_, _, _, _| Ok(GameState::EventFinished)),
            Transition::admin("finish", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );
    table.insert(
        K::Healer,
        vec![
            Transition::any("accept", |_, _, _, _| {
                Ok(GameState::ResolveEvent {
                    resolution: Resolution::Heal,
                })
            }),
            Transition::any("decline", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );
    table.insert(
        K::Sage,
        vec![
            Transition::any("accept", |_, _, _, _| {
                Ok(GameState::ResolveEvent {
                    resolution: Resolution::Teach,
                })
            }),
            Transition::any("decline", |_, _, _, _| Ok(GameState::EventFinished)),
            Transition::admin("finish", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );
    table.insert(
        K::ElevatorEvent,
        vec![
            Transition::any("up", |_, _, _, _| Ok(GameState::EnterTower { ascend: true })),
            Transition::any("ignore", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );
    table.insert(
        K::FamiliarEvent,
        vec![
            Transition::any("accept", |_, _, _, _| {
                Ok(GameState::ResolveEvent {
                    resolution: Resolution::Recruit,
                })
            }),
            Transition::any("decline", |_, _, _, _| Ok(GameState::EventFinished)),
        ],
    );
    table.insert(
        K::ResolveEvent,
        vec![Transition::admin("finish", |_, _, _, _| Ok(GameState::EventFinished))],
    );
    table.insert(
        K::EventFinished,
        vec![Transition::admin("wait", |_, _, _, _| Ok(GameState::WaitForEvent))],
    );
    table
});

// ============================================================================
// Builders
// ============================================================================

fn choose_familiar(
    _: &GameState,
    args: &[String],
    _: &GameContext,
    env: &Env<'_>,
) -> Result<GameState, Rejection> {
    let wanted = args.join(" ");
    let starters = &env.tables().starters;
    starters
        .iter()
        .find(|name| name.eq_ignore_ascii_case(wanted.trim()))
        .map(|name| GameState::ChooseFamiliar {
            species: name.clone(),
        })
        .ok_or_else(|| Rejection::new(format!("Choose one of: {}.", starters.join(", "))))
}

/// 1-based slot argument to a 0-based index within the inventory capacity.
fn parse_slot(args: &[String], ctx: &GameContext) -> Result<usize, Rejection> {
    let capacity = ctx.inventory.capacity();
    args.first()
        .and_then(|arg| arg.parse::<usize>().ok())
        .filter(|slot| (1..=capacity).contains(slot))
        .map(|slot| slot - 1)
        .ok_or_else(|| Rejection::new(format!("Choose a slot from 1 to {capacity}.")))
}

fn player_view(ctx: &GameContext) -> Result<ActionView<'_>, Rejection> {
    let familiar = ctx
        .familiar
        .as_ref()
        .ok_or_else(|| Rejection::new("You don't have a familiar yet."))?;
    Ok(ActionView::new(
        Side::Player,
        familiar,
        ctx.battle.as_ref(),
        &ctx.inventory,
    ))
}

fn check_item(args: &[String], ctx: &GameContext) -> Result<usize, Rejection> {
    let slot = parse_slot(args, ctx)?;
    UseItem::new(slot).can_perform(&player_view(ctx)?)?;
    Ok(slot)
}

fn player_action(ctx: &GameContext, action: BattleAction) -> Result<GameState, Rejection> {
    action.as_action().can_perform(&player_view(ctx)?)?;
    Ok(GameState::PlayerAction { action })
}

fn take_item(
    _: &GameState,
    args: &[String],
    ctx: &GameContext,
    _: &Env<'_>,
) -> Result<GameState, Rejection> {
    if args.is_empty() {
        if ctx.inventory.is_full() {
            return Err(Rejection {
                lines: vec![
                    "Your inventory is full.".to_owned(),
                    "Use take <slot> to replace an item, or leave it.".to_owned(),
                ],
            });
        }
        return Ok(GameState::ResolveEvent {
            resolution: Resolution::Take { slot: None },
        });
    }
    let slot = parse_slot(args, ctx)?;
    let slot = (slot < ctx.inventory.len()).then_some(slot);
    Ok(GameState::ResolveEvent {
        resolution: Resolution::Take { slot },
    })
}

fn trade_item(
    state: &GameState,
    args: &[String],
    ctx: &GameContext,
    _: &Env<'_>,
) -> Result<GameState, Rejection> {
    let slot = parse_slot(args, ctx)?;
    let Some(offered) = ctx.inventory.get(slot) else {
        return Err(ActionBlocked::EmptySlot { slot: slot + 1 }.into());
    };
    let trader = match state {
        GameState::Trader { name } => name.as_str(),
        _ => "The trader",
    };
    if let Some(wanted) = &ctx.item_buffer {
        if wanted.class() == offered.class() {
            return Err(Rejection::new(format!(
                "\"Are you kidding me?!\" {trader} snorts. \"I don't need another {}.\"",
                offered.name
            )));
        }
    }
    Ok(GameState::ResolveEvent {
        resolution: Resolution::Trade { slot },
    })
}

fn character_name(args: &[String]) -> String {
    args.join(" ")
}
