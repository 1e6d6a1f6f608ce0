//! Tower events other than battles.
use std::sync::Arc;

use super::prompt;
use crate::battle::Side;
use crate::config::GameConfig;
use crate::engine::{EngineError, Resolution};
use crate::env::{CharacterTraits, Env, SpellTraits, TrapEffect};
use crate::selection::SelectionCategory;
use crate::state::GameContext;
use crate::unit::Unit;

const NO_FAMILIAR: EngineError = EngineError::MissingContext("a familiar");

// ============================================================================
// Items and traps
// ============================================================================

pub(super) fn item_event(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let name = ctx.select(SelectionCategory::Item, &env.tables().weights.items)?;
    let item = env.item(&name)?;
    ctx.say(format!("You find a {}.", item.name));
    if !item.description.is_empty() {
        ctx.say(item.description.clone());
    }
    ctx.item_buffer = Some(item);
    if ctx.inventory.is_full() {
        ctx.say("Your inventory is full. Take it into a slot to replace that item.");
    }
    prompt(ctx, &["take [slot]", "leave"]);
    Ok(())
}

pub(super) fn trap_event(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let name = ctx.select(SelectionCategory::Trap, &env.tables().weights.traps)?;
    let trap = env.trap(&name)?;
    ctx.say(format!("You trigger a {}!", trap.name));
    if !trap.description.is_empty() {
        ctx.say(trap.description.clone());
    }

    let familiar = ctx.familiar.as_mut().ok_or(NO_FAMILIAR)?;
    let subject = familiar.subject(Side::Player);
    match &trap.effect {
        TrapEffect::Damage { percent } => {
            let amount = (familiar.max_hp() * percent / 100)
                .max(1)
                .min(familiar.hp().saturating_sub(1));
            let lost = familiar.take_damage(amount);
            ctx.say(format!("{} {lost} HP.", subject.says("lose", "loses")));
        }
        TrapEffect::Inflict { status, turns } => {
            familiar.statuses_mut().apply(*status, Some(*turns));
            ctx.say(status.applied_line(&subject));
        }
        TrapEffect::Alarm => {
            ctx.say("The noise draws a monster to you!");
            return ctx.generate("battle", Vec::new());
        }
        TrapEffect::Pitfall => {
            let below = ctx.floor.saturating_sub(1).max(1);
            if below < ctx.floor {
                ctx.floor = below;
                ctx.say(format!("You fall through to floor {below}."));
            } else {
                ctx.say("You land hard but stay on the ground floor.");
            }
        }
    }
    ctx.generate("finish", Vec::new())
}

// ============================================================================
// Characters
// ============================================================================

pub(super) fn character_event(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let name = ctx.select(SelectionCategory::Character, &env.tables().weights.characters)?;
    let character = env.character(&name)?;
    ctx.generate(character.kind.as_ref(), vec![character.name.clone()])
}

fn greet(ctx: &mut GameContext, character: &CharacterTraits) {
    ctx.say(format!("You meet {}.", character.name));
    if !character.greeting.is_empty() {
        ctx.say(format!("\"{}\"", character.greeting));
    }
}

pub(super) fn trader(ctx: &mut GameContext, env: &Env<'_>, name: &str) -> Result<(), EngineError> {
    let character = env.character(name)?;
    greet(ctx, &character);
    let offer = ctx.select(SelectionCategory::Trade, &env.tables().weights.trades)?;
    let item = env.item(&offer)?;
    ctx.say(format!(
        "{} offers a {} for one of your items.",
        character.name, item.name
    ));
    ctx.item_buffer = Some(item);
    if ctx.inventory.is_empty() {
        ctx.say("You have nothing to trade.");
        return ctx.generate("finish", Vec::new());
    }
    let listing = ctx.inventory.describe();
    ctx.paragraph();
    ctx.say_all(listing);
    prompt(ctx, &["trade <slot>", "leave"]);
    Ok(())
}

pub(super) fn healer(ctx: &mut GameContext, env: &Env<'_>, name: &str) -> Result<(), EngineError> {
    let character = env.character(name)?;
    greet(ctx, &character);
    ctx.say(format!("{} offers to tend to your wounds.", character.name));
    prompt(ctx, &["accept", "decline"]);
    Ok(())
}

pub(super) fn sage(ctx: &mut GameContext, env: &Env<'_>, name: &str) -> Result<(), EngineError> {
    let character = env.character(name)?;
    greet(ctx, &character);
    let familiar = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
    match lesson(familiar, env)? {
        Some(Lesson::Train(spell)) => {
            let line = format!("{} offers to train your {spell}.", character.name);
            ctx.say(line);
        }
        Some(Lesson::Awaken(spell)) => {
            let line = format!(
                "{} offers to awaken {} hidden talent for {}.",
                character.name,
                familiar.subject(Side::Player).possessive_lower(),
                spell.name
            );
            ctx.say(line);
        }
        None => {
            ctx.say(format!("{} has nothing to teach you.", character.name));
            return ctx.generate("finish", Vec::new());
        }
    }
    prompt(ctx, &["accept", "decline"]);
    Ok(())
}

/// What a sage can do for `familiar`.
enum Lesson {
    /// Raise the known spell one level.
    Train(String),
    /// Teach the species' dormant spell early.
    Awaken(Arc<SpellTraits>),
}

fn lesson(familiar: &Unit, env: &Env<'_>) -> Result<Option<Lesson>, EngineError> {
    if let Some(known) = familiar.spell() {
        if known.level >= GameConfig::MAX_SPELL_LEVEL {
            return Ok(None);
        }
        return Ok(Some(Lesson::Train(known.traits.name.clone())));
    }
    match familiar.traits().dormant_spell.as_deref() {
        Some(name) => Ok(Some(Lesson::Awaken(env.spell(name)?))),
        None => Ok(None),
    }
}

// ============================================================================
// Elevator and wild familiars
// ============================================================================

pub(super) fn elevator_event(ctx: &mut GameContext) -> Result<(), EngineError> {
    ctx.say("You find an elevator leading up.");
    prompt(ctx, &["up", "ignore"]);
    Ok(())
}

pub(super) fn familiar_event(ctx: &mut GameContext, env: &Env<'_>) -> Result<(), EngineError> {
    let species = ctx.select(SelectionCategory::Familiar, &env.tables().weights.familiars)?;
    let level = ctx.familiar_level();
    let wild = Unit::create(env.unit(&species)?, level, env)?;
    let current = ctx.familiar.as_ref().ok_or(NO_FAMILIAR)?;
    let lines = [
        format!(
            "A wild {} (Lv. {}) wants to join you.",
            wild.name(),
            wild.level()
        ),
        format!("{} would leave your side.", current.name()),
    ];
    ctx.say_all(lines);
    ctx.unit_buffer = Some(wild);
    prompt(ctx, &["accept", "decline"]);
    Ok(())
}

// ============================================================================
// Resolution
// ============================================================================

pub(super) fn resolve_event(
    ctx: &mut GameContext,
    env: &Env<'_>,
    resolution: Resolution,
) -> Result<(), EngineError> {
    let lines = match resolution {
        Resolution::Take { slot } => {
            let item = ctx
                .item_buffer
                .take()
                .ok_or(EngineError::MissingContext("a found item"))?;
            let name = item.name.clone();
            match slot.and_then(|slot| ctx.inventory.replace(slot, item.clone())) {
                Some(old) => vec![format!("You drop the {} and take the {name}.", old.name)],
                None => match ctx.inventory.push(item) {
                    Ok(_) => vec![format!("You put the {name} in your bag.")],
                    Err(_) => vec!["Your inventory is full.".to_owned()],
                },
            }
        }
        Resolution::Trade { slot } => {
            let item = ctx
                .item_buffer
                .take()
                .ok_or(EngineError::MissingContext("a trader's offer"))?;
            let name = item.name.clone();
            match ctx.inventory.replace(slot, item) {
                Some(old) => vec![format!("You hand over the {} and receive a {name}.", old.name)],
                None => vec!["The trade falls through.".to_owned()],
            }
        }
        Resolution::Heal => {
            let familiar = ctx.familiar.as_mut().ok_or(NO_FAMILIAR)?;
            let subject = familiar.subject(Side::Player);
            familiar.restore_all();
            let mut lines = vec![format!("{} fully restored.", subject.is())];
            for kind in familiar.statuses_mut().clear_debuffs() {
                lines.push(kind.cleared_line(&subject));
            }
            lines
        }
        Resolution::Teach => {
            let familiar = ctx.familiar.as_mut().ok_or(NO_FAMILIAR)?;
            let subject = familiar.subject(Side::Player);
            match lesson(familiar, env)? {
                Some(Lesson::Train(spell)) => match familiar.train_spell() {
                    Some(level) => vec![format!(
                        "{} {spell} grew to level {level}!",
                        subject.possessive()
                    )],
                    None => vec!["Nothing happens.".to_owned()],
                },
                Some(Lesson::Awaken(spell)) => {
                    let name = spell.name.clone();
                    familiar.learn_spell(spell);
                    vec![format!("{} {name}!", subject.says("learn", "learns"))]
                }
                None => vec!["Nothing happens.".to_owned()],
            }
        }
        Resolution::Recruit => {
            let wild = ctx
                .unit_buffer
                .take()
                .ok_or(EngineError::MissingContext("a wild familiar"))?;
            let joined = wild.name().to_owned();
            match ctx.familiar.replace(wild) {
                Some(old) => vec![format!("{} leaves, and {joined} joins you!", old.name())],
                None => vec![format!("{joined} joins you!")],
            }
        }
    };
    ctx.say_all(lines);
    ctx.generate("finish", Vec::new())
}
