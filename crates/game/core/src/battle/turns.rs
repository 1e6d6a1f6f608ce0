//! Turn order and start-of-turn effects.

use super::{BattleContext, Side};
use crate::config::GameConfig;
use crate::unit::{StatusKind, Talent, Unit};

/// How the turn that just opened resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDispatch {
    /// Wait for the player's command.
    Player,
    /// Let the enemy AI pick.
    Enemy,
    /// The acting side is confused and acts at random.
    Confused(Side),
    /// The acting side loses the turn.
    Skip(Side),
}

/// Result of opening a turn: who acts, the narration so far, and how the
/// turn resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnStart {
    pub side: Side,
    pub lines: Vec<String>,
    pub dispatch: TurnDispatch,
}

/// Open the next turn.
///
/// 1. Decide the acting side. Turns alternate, except that a Quick unit
///    facing a non-Quick one takes two in a row.
/// 2. Poison the acting unit (never below 1 HP) and note sleep or paralysis.
/// 3. Tick the acting unit's timed statuses.
/// 4. Decay the holy scroll when the turn passes back to the player.
/// 5. Pick the dispatch.
pub fn begin_turn(battle: &mut BattleContext, familiar: &mut Unit) -> TurnStart {
    let mut lines = Vec::new();
    let flipped = advance_side(battle, familiar);
    let side = battle.active;
    battle.turns += 1;

    let unit = match side {
        Side::Player => &mut *familiar,
        Side::Enemy => &mut battle.enemy,
    };
    let subject = unit.subject(side);

    if unit.has_status(StatusKind::Poison) {
        let damage = poison_damage(unit);
        if damage > 0 {
            unit.take_damage(damage);
            lines.push(format!(
                "{} {damage} poison damage.",
                subject.says("suffer", "suffers")
            ));
        }
    }

    let skips = if unit.has_status(StatusKind::Sleep) {
        lines.push(format!("{} fast asleep.", subject.is()));
        true
    } else if unit.has_status(StatusKind::Paralyze) {
        lines.push(format!("{} paralyzed and cannot move.", subject.is()));
        true
    } else {
        false
    };

    for kind in unit.statuses_mut().tick() {
        lines.push(kind.cleared_line(&subject));
    }
    let confused = unit.has_status(StatusKind::Confuse);

    if flipped && side == Side::Player && battle.holy_scroll > 0 {
        battle.holy_scroll -= 1;
        if battle.holy_scroll == 0 {
            lines.push("The holy light fades.".to_owned());
        }
    }

    let dispatch = if skips {
        TurnDispatch::Skip(side)
    } else if side == Side::Enemy && battle.shields_player() {
        lines.push(format!(
            "The holy light holds {} back.",
            battle.enemy.name()
        ));
        TurnDispatch::Skip(side)
    } else if confused {
        lines.push(format!("{} confused.", subject.is()));
        TurnDispatch::Confused(side)
    } else {
        match side {
            Side::Player => TurnDispatch::Player,
            Side::Enemy => TurnDispatch::Enemy,
        }
    };

    TurnStart {
        side,
        lines,
        dispatch,
    }
}

/// Move `battle.active` to the side acting next. Returns whether it changed.
fn advance_side(battle: &mut BattleContext, familiar: &Unit) -> bool {
    if battle.first_turn {
        battle.first_turn = false;
        battle.active = if battle.player_starts {
            Side::Player
        } else {
            Side::Enemy
        };
        battle.sub_turn = 0;
        return false;
    }

    let (current, other) = match battle.active {
        Side::Player => (familiar, &battle.enemy),
        Side::Enemy => (&battle.enemy, familiar),
    };
    let double_turn = current.has_talent(Talent::QUICK) && !other.has_talent(Talent::QUICK);
    if double_turn && battle.sub_turn < GameConfig::MAX_SUB_TURN {
        battle.sub_turn += 1;
        return false;
    }
    battle.active = battle.active.opponent();
    battle.sub_turn = 0;
    true
}

/// `ceil(max_hp / 16)`, capped so the unit keeps at least 1 HP.
pub(crate) fn poison_damage(unit: &Unit) -> u32 {
    let full = unit.max_hp().div_ceil(GameConfig::POISON_DIVISOR);
    full.min(unit.hp().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use crate::testing::{fixture_registry, unit};

    fn sides(battle: &mut BattleContext, familiar: &mut Unit, count: usize) -> Vec<Side> {
        (0..count).map(|_| begin_turn(battle, familiar).side).collect()
    }

    #[test]
    fn plain_units_alternate() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 0);
        battle.player_starts = true;
        assert_eq!(
            sides(&mut battle, &mut ember, 4),
            vec![Side::Player, Side::Enemy, Side::Player, Side::Enemy]
        );
    }

    #[test]
    fn quick_unit_takes_two_turns_against_slow_one() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut sprite = unit(&env, "Sprite", 1);
        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 0);
        battle.decide_opening(&sprite, false);
        assert_eq!(
            sides(&mut battle, &mut sprite, 6),
            vec![
                Side::Player,
                Side::Player,
                Side::Enemy,
                Side::Player,
                Side::Player,
                Side::Enemy
            ]
        );
    }

    #[test]
    fn two_quick_units_alternate() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut sprite = unit(&env, "Sprite", 1);
        let mut battle = BattleContext::new(unit(&env, "Sprite", 1), 0);
        assert_eq!(
            sides(&mut battle, &mut sprite, 4),
            vec![Side::Enemy, Side::Player, Side::Enemy, Side::Player]
        );
    }

    #[test]
    fn poison_never_drops_below_one() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        ember.statuses_mut().apply(StatusKind::Poison, None);
        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 0);
        battle.player_starts = true;

        // max 30 -> ceil(30 / 16) = 2
        let start = begin_turn(&mut battle, &mut ember);
        assert_eq!(start.lines, vec!["You suffer 2 poison damage."]);
        assert_eq!(ember.hp(), 28);

        ember.take_damage(ember.hp() - 2);
        assert_eq!(poison_damage(&ember), 1);
        ember.take_damage(1);
        assert_eq!(poison_damage(&ember), 0);

        battle.first_turn = true;
        let start = begin_turn(&mut battle, &mut ember);
        assert!(start.lines.is_empty());
        assert_eq!(ember.hp(), 1);
    }

    #[test]
    fn sleeping_unit_skips_and_wakes_when_the_timer_runs_out() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        ember.statuses_mut().apply(StatusKind::Sleep, Some(1));
        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 0);
        battle.player_starts = true;

        let start = begin_turn(&mut battle, &mut ember);
        assert_eq!(start.dispatch, TurnDispatch::Skip(Side::Player));
        assert_eq!(
            start.lines,
            vec!["You are fast asleep.", "You are no longer asleep."]
        );
        assert!(!ember.has_status(StatusKind::Sleep));
    }

    #[test]
    fn holy_scroll_suppresses_enemy_and_decays_per_round() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 0);
        battle.player_starts = true;
        battle.holy_scroll = 2;

        assert_eq!(begin_turn(&mut battle, &mut ember).dispatch, TurnDispatch::Player);
        assert_eq!(battle.holy_scroll, 2);
        let enemy = begin_turn(&mut battle, &mut ember);
        assert_eq!(enemy.dispatch, TurnDispatch::Skip(Side::Enemy));
        assert_eq!(enemy.lines, vec!["The holy light holds Goblin back."]);

        begin_turn(&mut battle, &mut ember);
        assert_eq!(battle.holy_scroll, 1);
        assert_eq!(begin_turn(&mut battle, &mut ember).dispatch, TurnDispatch::Skip(Side::Enemy));

        let player = begin_turn(&mut battle, &mut ember);
        assert_eq!(player.lines, vec!["The holy light fades."]);
        assert_eq!(begin_turn(&mut battle, &mut ember).dispatch, TurnDispatch::Enemy);
    }

    #[test]
    fn confused_unit_acts_at_random() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        let mut battle = BattleContext::new(unit(&env, "Goblin", 1), 0);
        battle.enemy.statuses_mut().apply(StatusKind::Confuse, Some(3));
        let start = begin_turn(&mut battle, &mut ember);
        assert_eq!(start.dispatch, TurnDispatch::Confused(Side::Enemy));
        assert_eq!(start.lines, vec!["Goblin is confused."]);
        assert_eq!(battle.enemy.statuses().remaining(StatusKind::Confuse), Some(2));
    }
}
