//! Experience, level-ups, evolution and dormant spell awakening.
use super::Unit;
use crate::battle::Side;
use crate::env::{Env, LevelTable, OracleError};

/// Experience earned by `player` for defeating `enemy`.
///
/// Nothing at max level; `exp_yield × enemy level`, doubled when the enemy
/// out-levels the player.
pub fn experience_for(player: &Unit, enemy: &Unit, levels: &LevelTable) -> u32 {
    if player.level() >= levels.max_level() {
        return 0;
    }
    let base = enemy.traits().exp_yield * enemy.level();
    if enemy.level() > player.level() {
        base * 2
    } else {
        base
    }
}

/// Grant `amount` experience to the player's familiar and apply every
/// resulting level-up in order.
///
/// Each new level may awaken the dormant spell (or train the known one) at
/// the configured level and may trigger evolution.
///
/// # Errors
///
/// Returns an `OracleError` if an evolution target, its ability or a dormant
/// spell is missing from the content.
pub fn award_experience(
    unit: &mut Unit,
    amount: u32,
    env: &Env<'_>,
) -> Result<Vec<String>, OracleError> {
    let mut lines = Vec::new();
    if amount == 0 {
        return Ok(lines);
    }
    let tables = env.tables();
    let subject = unit.subject(Side::Player);
    lines.push(format!(
        "{} {amount} experience.",
        subject.says("gain", "gains")
    ));

    let start = unit.level();
    let cap = tables
        .levels
        .threshold(tables.levels.max_level())
        .unwrap_or(u32::MAX);
    let total = unit.exp().saturating_add(amount).min(cap.max(unit.exp()));
    let gained = unit.set_exp(total, &tables.levels);

    for level in start + 1..=start + gained {
        lines.push(format!("{} reached level {level}!", subject.nominative()));

        if level == tables.dormant_spell_level {
            awaken_spell(unit, env, &mut lines)?;
        }

        if let Some(evolution) = unit.traits().evolution.clone() {
            if level >= evolution.level {
                let next = env.unit(&evolution.into)?;
                let ability = next
                    .ability
                    .as_deref()
                    .map(|name| env.ability(name))
                    .transpose()?;
                lines.push(format!(
                    "{} {} into {}!",
                    subject.nominative(),
                    subject.verb("evolve", "evolves"),
                    next.name
                ));
                if unit.spell().is_none() {
                    if let Some(name) = next.spell.as_deref() {
                        let spell = env.spell(name)?;
                        lines.push(format!(
                            "{} {}!",
                            subject.says("learned", "learned"),
                            spell.name
                        ));
                        unit.learn_spell(spell);
                    }
                }
                unit.evolve(next, ability);
            }
        }
    }
    Ok(lines)
}

fn awaken_spell(unit: &mut Unit, env: &Env<'_>, lines: &mut Vec<String>) -> Result<(), OracleError> {
    let subject = unit.subject(Side::Player);
    match unit.spell() {
        Some(known) => {
            let name = known.traits.name.clone();
            if let Some(level) = unit.train_spell() {
                lines.push(format!(
                    "{} {name} grew to level {level}!",
                    subject.possessive()
                ));
            }
        }
        None => {
            if let Some(name) = unit.traits().dormant_spell.clone() {
                let spell = env.spell(&name)?;
                lines.push(format!(
                    "A dormant power stirs. {} {}!",
                    subject.says("awakened", "awakened"),
                    spell.name
                ));
                unit.learn_spell(spell);
            }
        }
    }
    Ok(())
}
