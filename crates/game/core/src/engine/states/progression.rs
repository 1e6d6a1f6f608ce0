//! Run lifecycle: start, familiar choice, floors and event generation.
use std::str::FromStr;

use super::prompt;
use crate::action::{BattleAction, UseItem};
use crate::battle::Side;
use crate::engine::EngineError;
use crate::env::{Env, EventKind};
use crate::selection::SelectionCategory;
use crate::state::GameContext;
use crate::unit::Unit;

pub(super) fn start(ctx: &mut GameContext) -> Result<(), EngineError> {
    ctx.say("Welcome to the tower.");
    ctx.say("Type start to begin your climb.");
    Ok(())
}

pub(super) fn initialize(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    ctx.say("A familiar will climb the tower with you.");
    ctx.say(format!(
        "Choose one of: {}.",
        env.tables().starters.join(", ")
    ));
    prompt(ctx, &["choose <familiar>"]);
    Ok(())
}

pub(super) fn choose_familiar(
    ctx: &mut GameContext,
    env: &Env<'_>,
    species: &str,
) -> Result<(), EngineError> {
    let familiar = Unit::create(env.unit(species)?, 1, env)?;
    ctx.say(format!("{} joins you!", familiar.name()));
    ctx.familiar = Some(familiar);
    ctx.generate("enter", Vec::new())
}

pub(super) fn enter_tower(
    ctx: &mut GameContext,
    env: &Env<'_>,
    ascend: bool,
) -> Result<(), EngineError> {
    ctx.paragraph();
    if ascend {
        ctx.move_to_floor(ctx.floor + 1);
        ctx.say(format!("The elevator carries you up to floor {}.", ctx.floor));
    } else {
        ctx.say(format!("You step into the tower. Floor {}.", ctx.floor));
    }
    if ctx.floor >= env.tables().max_floor {
        ctx.generate("victory", Vec::new())
    } else {
        ctx.generate("wait", Vec::new())
    }
}

pub(super) fn wait_for_event(ctx: &mut GameContext) -> Result<(), EngineError> {
    ctx.paragraph();
    ctx.say(format!("You explore floor {}...", ctx.floor));
    Ok(())
}

pub(super) fn use_item(ctx: &mut GameContext, env: &Env<'_>, slot: usize) -> Result<(), EngineError> {
    let action = BattleAction::Item(UseItem::new(slot));
    let lines = {
        let mut actx = ctx
            .action_context(Side::Player, *env)
            .ok_or(EngineError::MissingContext("a familiar"))?;
        action
            .execute(&mut actx)
            .unwrap_or_else(|blocked| vec![blocked.to_string()])
    };
    ctx.say_all(lines);
    ctx.generate("wait", Vec::new())
}

pub(super) fn generate_event(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    ctx.counters.events += 1;
    let name = ctx.select(SelectionCategory::Event, &env.tables().weights.events)?;
    let kind = EventKind::from_str(&name).map_err(|_| EngineError::UnknownEventKind(name))?;
    ctx.paragraph();
    ctx.generate(kind.as_ref(), Vec::new())
}

pub(super) fn event_finished(ctx: &mut GameContext) -> Result<(), EngineError> {
    ctx.item_buffer = None;
    ctx.unit_buffer = None;
    ctx.generate("wait", Vec::new())
}

pub(super) fn game_over(ctx: &mut GameContext, won: bool) -> Result<(), EngineError> {
    ctx.paragraph();
    if won {
        ctx.say("You have reached the top of the tower!");
        ctx.say("Your climb is complete.");
    } else {
        ctx.say(format!("Your journey ends on floor {}.", ctx.floor));
    }
    ctx.paragraph();
    let records = ctx.counters.describe();
    ctx.say_all(records);
    ctx.say("Type restart to begin a new run.");
    Ok(())
}
