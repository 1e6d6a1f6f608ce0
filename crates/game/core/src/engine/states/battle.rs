//! Battle states: encounter, preparation, the turn loop and the aftermath.
use super::prompt;
use crate::action::{ActionView, BattleAction, UseItem};
use crate::battle::{
    BattleContext, BattleResult, ConfusedChoice, Side, TurnDispatch, attempt_flee, begin_turn,
    choose_confused_action, choose_enemy_action, finish_battle, is_over,
};
use crate::engine::EngineError;
use crate::env::{Env, RandomSource};
use crate::selection::SelectionCategory;
use crate::state::GameContext;
use crate::unit::Unit;

const NO_BATTLE: EngineError = EngineError::MissingContext("an active battle");
const NO_FAMILIAR: EngineError = EngineError::MissingContext("a familiar");

// ============================================================================
// Encounter and preparation
// ============================================================================

pub(super) fn start_battle(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let tables = env.tables();
    let enemy = match ctx.unit_buffer.take() {
        Some(enemy) => enemy,
        None => {
            let name = ctx.select(SelectionCategory::Monster, &tables.weights.monsters)?;
            let level = ctx.floor + ctx.rng.below(tables.enemy_level_spread + 1);
            Unit::create(env.unit(&name)?, level, env)?
        }
    };
    ctx.say(format!(
        "You run into {} (Lv. {}).",
        enemy.name(),
        enemy.level()
    ));
    ctx.battle = Some(BattleContext::new(enemy, tables.prepare_turns));
    ctx.generate("prepare", Vec::new())
}

pub(super) fn prepare_phase(ctx: &mut GameContext, turn_used: bool) -> Result<(), EngineError> {
    let battle = ctx.battle.as_mut().ok_or(NO_BATTLE)?;
    if turn_used {
        battle.prepare_counter = battle.prepare_counter.saturating_sub(1);
    }
    let enemy = battle.enemy.name().to_owned();
    if battle.prepare_counter == 0 {
        let familiar = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
        battle.decide_opening(familiar, false);
        ctx.say(format!("{enemy} noticed you!"));
        return ctx.generate("fight", Vec::new());
    }
    ctx.say(format!("{enemy} hasn't noticed you yet."));
    prompt(ctx, &["approach", "use <slot>", "wait", "flee"]);
    Ok(())
}

pub(super) fn prepare_item(
    ctx: &mut GameContext,
    env: &Env<'_>,
    slot: usize,
) -> Result<(), EngineError> {
    let action = BattleAction::Item(UseItem::new(slot));
    act(ctx, env, Side::Player, &action)?;
    if battle_over(ctx)? {
        ctx.generate("finish", Vec::new())
    } else {
        ctx.generate("prepare", Vec::new())
    }
}

pub(super) fn approach(ctx: &mut GameContext) -> Result<(), EngineError> {
    let battle = ctx.battle.as_mut().ok_or(NO_BATTLE)?;
    let familiar = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
    battle.prepare_counter = 0;
    battle.decide_opening(familiar, true);
    let line = format!("You sneak up on {}.", battle.enemy.name());
    ctx.say(line);
    ctx.generate("fight", Vec::new())
}

pub(super) fn flee(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let battle = ctx.battle.as_mut().ok_or(NO_BATTLE)?;
    let preparing = battle.is_preparing();
    let (escaped, lines) = attempt_flee(battle, &env.tables().flee, &mut ctx.rng);
    ctx.say_all(lines);
    let command = match (escaped, preparing) {
        (true, _) => "finish",
        (false, true) => "fight",
        (false, false) => "next",
    };
    ctx.generate(command, Vec::new())
}

// ============================================================================
// Turn loop
// ============================================================================

pub(super) fn battle_phase(ctx: &mut GameContext) -> Result<(), EngineError> {
    let (Some(familiar), Some(battle)) = (ctx.familiar.as_mut(), ctx.battle.as_mut()) else {
        return Err(NO_BATTLE);
    };
    if is_over(battle, familiar) {
        return ctx.generate("finish", Vec::new());
    }
    let start = begin_turn(battle, familiar);
    ctx.counters.turns += 1;
    ctx.paragraph();
    ctx.say_all(start.lines);
    let command = match start.dispatch {
        TurnDispatch::Player => "player",
        TurnDispatch::Enemy => "enemy",
        TurnDispatch::Confused(_) => "confused",
        TurnDispatch::Skip(_) => "skip",
    };
    ctx.generate(command, Vec::new())
}

pub(super) fn player_turn(ctx: &mut GameContext) -> Result<(), EngineError> {
    let (Some(familiar), Some(battle)) = (ctx.familiar.as_ref(), ctx.battle.as_ref()) else {
        return Err(NO_BATTLE);
    };
    let status = format!(
        "{} HP {}/{} MP {}/{} | {} HP {}/{}",
        familiar.name(),
        familiar.hp(),
        familiar.max_hp(),
        familiar.mp(),
        familiar.max_mp(),
        battle.enemy.name(),
        battle.enemy.hp(),
        battle.enemy.max_hp()
    );
    ctx.say(status);
    prompt(ctx, &["attack", "cast", "ability", "use <slot>", "flee"]);
    Ok(())
}

pub(super) fn player_action(
    ctx: &mut GameContext,
    env: &Env<'_>,
    action: &BattleAction,
) -> Result<(), EngineError> {
    act(ctx, env, Side::Player, action)?;
    after_action(ctx)
}

pub(super) fn enemy_turn(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let action = {
        let familiar = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
        let battle = ctx.battle.as_ref().ok_or(NO_BATTLE)?;
        let view = ActionView::new(Side::Enemy, familiar, Some(battle), &ctx.inventory);
        choose_enemy_action(&view, &mut ctx.rng)
    };
    act(ctx, env, Side::Enemy, &action)?;
    after_action(ctx)
}

pub(super) fn confused_turn(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let (side, choice) = {
        let familiar = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
        let battle = ctx.battle.as_ref().ok_or(NO_BATTLE)?;
        let side = battle.active;
        let view = ActionView::new(side, familiar, Some(battle), &ctx.inventory);
        (side, choose_confused_action(&view, &mut ctx.rng))
    };
    let lines = {
        let mut actx = ctx.action_context(side, *env).ok_or(NO_FAMILIAR)?;
        match choice {
            ConfusedChoice::Skip => actx
                .subject(side)
                .map(|subject| {
                    vec![format!(
                        "{} around in a daze.",
                        subject.says("stumble", "stumbles")
                    )]
                })
                .unwrap_or_default(),
            ConfusedChoice::Act { action, target } => {
                action.as_action().perform(&mut actx, target)
            }
        }
    };
    ctx.say_all(lines);
    after_action(ctx)
}

pub(super) fn skip_turn(ctx: &mut GameContext) -> Result<(), EngineError> {
    after_action(ctx)
}

pub(super) fn battle_finished(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let battle = ctx.battle.take().ok_or(NO_BATTLE)?;
    let familiar = ctx.familiar.as_mut().ok_or(NO_FAMILIAR)?;
    let outcome = finish_battle(familiar, &battle, env)?;
    ctx.paragraph();
    ctx.say_all(outcome.lines);
    match outcome.result {
        BattleResult::Lost => ctx.generate("died", Vec::new()),
        BattleResult::Won => {
            ctx.counters.battles_won += 1;
            ctx.generate("end", Vec::new())
        }
        BattleResult::Fled => ctx.generate("end", Vec::new()),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Check and resolve `action` for `side`, narrating a refusal as well.
fn act(
    ctx: &mut GameContext,
    env: &Env<'_>,
    side: Side,
    action: &BattleAction,
) -> Result<(), EngineError> {
    let lines = {
        let mut actx = ctx.action_context(side, *env).ok_or(NO_FAMILIAR)?;
        action
            .execute(&mut actx)
            .unwrap_or_else(|blocked| vec![blocked.to_string()])
    };
    ctx.say_all(lines);
    Ok(())
}

fn battle_over(ctx: &GameContext) -> Result<bool, EngineError> {
    let battle = ctx.battle.as_ref().ok_or(NO_BATTLE)?;
    let familiar = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
    Ok(is_over(battle, familiar))
}

fn after_action(ctx: &mut GameContext) -> Result<(), EngineError> {
    if battle_over(ctx)? {
        ctx.generate("finish", Vec::new())
    } else {
        ctx.generate("next", Vec::new())
    }
}
