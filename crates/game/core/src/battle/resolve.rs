//! End-of-battle checks, fleeing and the battle's aftermath.

use super::{BattleContext, Side};
use crate::env::{Env, FleeChances, OracleError, RandomSource};
use crate::unit::{Unit, award_experience, experience_for};

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BattleResult {
    Won,
    Lost,
    Fled,
}

/// Aftermath of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleOutcome {
    pub result: BattleResult,
    pub lines: Vec<String>,
    pub experience: u32,
}

/// Whether the battle is over: finished by an action, or a side is down.
pub fn is_over(battle: &BattleContext, familiar: &Unit) -> bool {
    battle.finished || !battle.enemy.is_alive() || !familiar.is_alive()
}

/// Close the battle.
///
/// The player loses every status and the stats boost (narrated), and earns
/// experience for a defeated enemy.
///
/// # Errors
///
/// Returns an `OracleError` if a level-up references missing content.
pub fn finish_battle(
    familiar: &mut Unit,
    battle: &BattleContext,
    env: &Env<'_>,
) -> Result<BattleOutcome, OracleError> {
    let subject = familiar.subject(Side::Player);
    let enemy = &battle.enemy;
    let mut lines = Vec::new();

    let result = if !familiar.is_alive() {
        lines.push(format!("{} collapse.", subject.nominative()));
        BattleResult::Lost
    } else if !battle.fled && !enemy.is_alive() {
        lines.push(format!("{} is defeated!", enemy.name()));
        BattleResult::Won
    } else {
        BattleResult::Fled
    };

    for kind in familiar.statuses_mut().clear_all() {
        lines.push(kind.cleared_line(&subject));
    }
    if familiar.clear_stats_boost() {
        lines.push(format!("{} focus fades.", subject.possessive()));
    }

    let mut experience = 0;
    if result == BattleResult::Won {
        experience = experience_for(familiar, enemy, &env.tables().levels);
        lines.extend(award_experience(familiar, experience, env)?);
    }

    Ok(BattleOutcome {
        result,
        lines,
        experience,
    })
}

/// Try to run away.
///
/// The chance depends on whether the enemy has noticed the player yet. A
/// failed attempt during preparation alerts the enemy, which then opens the
/// fight. Returns whether the player escaped.
pub fn attempt_flee(
    battle: &mut BattleContext,
    chances: &FleeChances,
    rng: &mut dyn RandomSource,
) -> (bool, Vec<String>) {
    let preparing = battle.is_preparing();
    let chance = if preparing {
        chances.prepare
    } else {
        chances.battle
    };
    if rng.percent(chance) {
        battle.fled = true;
        battle.finished = true;
        return (true, vec!["You got away safely.".to_owned()]);
    }

    let mut lines = vec!["You couldn't get away!".to_owned()];
    if preparing {
        battle.prepare_counter = 0;
        battle.player_starts = false;
        lines.push(format!("{} noticed you!", battle.enemy.name()));
    }
    (false, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Scenario, ScriptedRng};
    use crate::unit::StatusKind;

    #[test]
    fn victory_clears_statuses_and_awards_experience() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 2);
        scenario.familiar.statuses_mut().apply(StatusKind::Poison, None);
        scenario.familiar.set_stats_boost(150);
        let hp = scenario.enemy().hp();
        scenario.enemy_mut().take_damage(hp);
        assert!(is_over(&scenario.battle, &scenario.familiar));

        let outcome = scenario.finish().unwrap();
        assert_eq!(outcome.result, BattleResult::Won);
        // exp_yield 4 * level 2, doubled for the higher level
        assert_eq!(outcome.experience, 16);
        assert_eq!(
            outcome.lines,
            vec![
                "Goblin is defeated!",
                "You are no longer poisoned.",
                "Your focus fades.",
                "You gain 16 experience.",
                "You reached level 2!",
            ]
        );
        assert!(scenario.familiar.statuses().is_empty());
        assert_eq!(scenario.familiar.stats_boost(), 100);
    }

    #[test]
    fn defeat_awards_nothing() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        let hp = scenario.familiar.hp();
        scenario.familiar.take_damage(hp);
        let outcome = scenario.finish().unwrap();
        assert_eq!(outcome.result, BattleResult::Lost);
        assert_eq!(outcome.experience, 0);
        assert_eq!(outcome.lines, vec!["You collapse."]);
    }

    #[test]
    fn failed_flee_while_preparing_alerts_the_enemy() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.battle.prepare_counter = 2;
        let chances = FleeChances::default();
        let mut rng = ScriptedRng::new([99]);
        let (escaped, lines) = attempt_flee(&mut scenario.battle, &chances, &mut rng);
        assert!(!escaped);
        assert_eq!(lines, vec!["You couldn't get away!", "Goblin noticed you!"]);
        assert_eq!(scenario.battle.prepare_counter, 0);

        let mut rng = ScriptedRng::new([39]);
        let (escaped, _) = attempt_flee(&mut scenario.battle, &chances, &mut rng);
        assert!(escaped);
        assert!(scenario.battle.fled && scenario.battle.finished);
        assert_eq!(scenario.finish().unwrap().result, BattleResult::Fled);
    }
}
