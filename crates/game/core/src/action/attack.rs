use super::{ActionBlocked, ActionContext, ActionView, UnitAction};
use crate::battle::Side;
use crate::combat::{
    DamageRoll, DefenseProfile, StrikeProfile, critical_chance, hit_chance, physical_damage,
};
use crate::unit::{Status, StatusKind, Talent};

/// Chance (percent) for each recoverable condition to break on a hit.
const WAKE_CHANCE: u32 = 25;

/// Plain physical attack. Always affordable; a confused unit may hit itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicalAttack;

impl UnitAction for PhysicalAttack {
    fn can_target_self(&self, _view: &ActionView<'_>) -> bool {
        true
    }

    fn can_target_other(&self, _view: &ActionView<'_>) -> bool {
        true
    }

    fn select_target(&self, view: &ActionView<'_>) -> Option<Side> {
        let opponent = view.performer.opponent();
        view.unit(opponent).map(|_| opponent)
    }

    fn can_perform(&self, view: &ActionView<'_>) -> Result<(), ActionBlocked> {
        if view.unit(view.performer.opponent()).is_none() {
            return Err(ActionBlocked::NoTarget);
        }
        Ok(())
    }

    fn perform(&self, ctx: &mut ActionContext<'_>, target: Option<Side>) -> Vec<String> {
        let mut lines = Vec::new();
        let performer = ctx.performer;
        let Some(target) = target else {
            return lines;
        };
        let (Some(attacker), Some(defender)) = (ctx.unit(performer), ctx.unit(target)) else {
            return lines;
        };

        let attacker_subject = attacker.subject(performer);
        let target_subject = defender.subject(target);
        let strike = StrikeProfile::of(attacker);
        let defense = DefenseProfile::against(defender, strike.genus);
        let hit = hit_chance(
            attacker.luck(),
            attacker.has_status(StatusKind::Blind),
            defender.has_status(StatusKind::Invisible),
        );
        let crit = critical_chance(attacker.luck(), attacker.has_talent(Talent::EASY_CRITS));
        let thorns = target != performer && defender.has_talent(Talent::THORNS);

        if !hit.roll(ctx.rng) {
            lines.push(format!("{}.", attacker_subject.says("miss", "misses")));
            return lines;
        }
        let critical = crit.roll(ctx.rng);
        let roll = DamageRoll::roll(ctx.rng);
        let damage = physical_damage(&strike, &defense, roll, critical).damage;

        if critical {
            lines.push("Critical hit!".to_owned());
        }
        if target == Side::Player && ctx.holy_shield_active() {
            lines.push(format!(
                "{}. The holy light shields you.",
                attacker_subject.says("strike", "strikes")
            ));
            return lines;
        }

        let dealt = ctx.damage(target, damage);
        let verb = attacker_subject.says("hit", "hits");
        let mut line = if target == performer {
            format!(
                "{verb} {} dealing {dealt} damage.",
                attacker_subject.verb("yourself", "itself")
            )
        } else {
            format!("{verb} dealing {dealt} damage.")
        };
        if let Some(left) = ctx.hp_left(target) {
            line = format!("{line} {left}");
        }
        lines.push(line);

        if thorns && dealt > 0 {
            let recoil = (dealt / 4).max(1);
            let taken = ctx.damage(performer, recoil);
            if taken > 0 {
                lines.push(format!(
                    "{} pricked by thorns and {} {taken} damage.",
                    attacker_subject.is(),
                    attacker_subject.verb("take", "takes")
                ));
            }
        }

        let held = ctx
            .unit(target)
            .filter(|defender| defender.is_alive())
            .map_or(Status::empty(), |defender| {
                defender.statuses().flags() & Status::RECOVERABLE
            });
        for kind in held.iter().filter_map(StatusKind::from_flag) {
            if !ctx.rng.percent(WAKE_CHANCE) {
                continue;
            }
            if let Some(defender) = ctx.unit_mut(target) {
                defender.statuses_mut().clear(kind);
            }
            lines.push(kind.cleared_line(&target_subject));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::BattleAction;
    use crate::testing::{Scenario, ScriptedRng};

    fn attack(ctx: &mut ActionContext<'_>) -> Vec<String> {
        BattleAction::Attack(PhysicalAttack).execute(ctx).unwrap()
    }

    #[test]
    fn narrated_hit_matches_formula() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        assert_eq!(scenario.familiar.attack(), 20);
        assert_eq!(scenario.familiar.luck(), 40);
        assert_eq!(scenario.enemy().defense(), 5);
        assert_eq!(scenario.enemy().hp(), 40);

        // hit (0 < 39 of 40), no crit (127 of 128), Normal roll (1 of 4)
        let mut rng = ScriptedRng::new([0, 127, 1]);
        let lines = attack(&mut scenario.player_ctx(&mut rng));
        assert_eq!(lines, vec!["You hit dealing 18 damage. Goblin has 22 HP left."]);
        assert_eq!(scenario.enemy().hp(), 22);
    }

    #[test]
    fn zero_luck_attacker_misses() {
        let mut scenario = Scenario::battle("Ember", 1, "Husk", 1);
        let mut rng = ScriptedRng::new([0]);
        let lines = attack(&mut scenario.enemy_ctx(&mut rng));
        assert_eq!(lines, vec!["Husk misses."]);
        assert_eq!(scenario.familiar.hp(), scenario.familiar.max_hp());
    }

    #[test]
    fn thorns_recoil_hurts_attacker() {
        let mut scenario = Scenario::battle("Ember", 1, "Bramble", 1);
        let before = scenario.familiar.hp();
        let mut rng = ScriptedRng::new([0, 127, 1]);
        let lines = attack(&mut scenario.player_ctx(&mut rng));
        assert!(lines[1].starts_with("You are pricked by thorns and take"));
        assert!(scenario.familiar.hp() < before);
    }

    #[test]
    fn hit_may_wake_a_sleeping_defender() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario
            .enemy_mut()
            .statuses_mut()
            .apply(StatusKind::Sleep, Some(3));
        // hit, no crit, Normal roll, then the wake roll (0 < 25 of 100)
        let mut rng = ScriptedRng::new([0, 127, 1, 0]);
        let lines = attack(&mut scenario.player_ctx(&mut rng));
        assert_eq!(lines.last().unwrap(), "Goblin is no longer asleep.");
        assert!(!scenario.enemy().has_status(StatusKind::Sleep));
    }

    #[test]
    fn confused_self_hit_uses_reflexive_narration() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        let mut rng = ScriptedRng::new([0, 127, 1]);
        let lines = {
            let mut ctx = scenario.player_ctx(&mut rng);
            PhysicalAttack.perform(&mut ctx, Some(Side::Player))
        };
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("You hit yourself dealing"));
        assert!(scenario.familiar.hp() < scenario.familiar.max_hp());
    }

    #[test]
    fn holy_light_blocks_damage_to_player() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.battle.holy_scroll = 2;
        let mut rng = ScriptedRng::new([0, 127, 1]);
        let lines = attack(&mut scenario.enemy_ctx(&mut rng));
        assert_eq!(lines, vec!["Goblin strikes. The holy light shields you."]);
        assert_eq!(scenario.familiar.hp(), scenario.familiar.max_hp());
    }
}
