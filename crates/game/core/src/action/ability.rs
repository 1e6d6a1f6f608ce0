use super::{ActionBlocked, ActionContext, ActionView, UnitAction, check_mp};
use crate::battle::Side;
use crate::env::AbilityBehavior;

/// Use the performer's active ability. Every active ability targets its user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UseAbility;

impl UnitAction for UseAbility {
    fn can_target_self(&self, view: &ActionView<'_>) -> bool {
        view.performer_unit()
            .and_then(|unit| unit.ability())
            .is_some_and(|ability| !ability.behavior.is_passive())
    }

    fn can_target_other(&self, _view: &ActionView<'_>) -> bool {
        false
    }

    fn can_perform(&self, view: &ActionView<'_>) -> Result<(), ActionBlocked> {
        let Some(unit) = view.performer_unit() else {
            return Err(ActionBlocked::NoTarget);
        };
        let subject = unit.subject(view.performer);
        let Some(ability) = unit.ability() else {
            return Err(ActionBlocked::no_ability(&subject));
        };
        if ability.behavior.is_passive() {
            return Err(ActionBlocked::PassiveAbility {
                ability: ability.name.clone(),
            });
        }
        check_mp(unit, view.performer, ability.mp_cost)?;
        match ability.behavior {
            AbilityBehavior::Heal { .. } if unit.hp() >= unit.max_hp() => {
                Err(ActionBlocked::full_health(&subject))
            }
            AbilityBehavior::Focus { boost } if unit.stats_boost() >= boost => {
                Err(ActionBlocked::already_focused(&subject))
            }
            AbilityBehavior::Purify
                if !unit.statuses().iter().any(|kind| kind.is_debuff()) =>
            {
                Err(ActionBlocked::NothingToCure)
            }
            _ => Ok(()),
        }
    }

    fn perform(&self, ctx: &mut ActionContext<'_>, target: Option<Side>) -> Vec<String> {
        let performer = ctx.performer;
        let target = target.unwrap_or(performer);
        let Some(ability) = ctx.unit(performer).and_then(|unit| unit.ability()).cloned() else {
            return Vec::new();
        };
        let (Some(user_subject), Some(subject)) = (ctx.subject(performer), ctx.subject(target))
        else {
            return Vec::new();
        };
        if let Some(user) = ctx.unit_mut(performer) {
            user.spend_mp(ability.mp_cost);
        }

        let mut lines = vec![format!(
            "{} {}.",
            user_subject.says("use", "uses"),
            ability.name
        )];
        let Some(unit) = ctx.unit_mut(target) else {
            return lines;
        };
        match ability.behavior {
            AbilityBehavior::Weapon { .. } => {}
            AbilityBehavior::Heal { percent } => {
                let amount = (unit.max_hp() * percent / 100).max(1);
                let healed = unit.heal(amount);
                lines.push(format!("{} {healed} HP.", subject.says("recover", "recovers")));
            }
            AbilityBehavior::Focus { boost } => {
                unit.set_stats_boost(boost);
                lines.push(format!("{} now focused.", subject.is()));
            }
            AbilityBehavior::Purify => {
                for kind in unit.statuses_mut().clear_debuffs() {
                    lines.push(kind.cleared_line(&subject));
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::BattleAction;
    use crate::testing::{Scenario, ScriptedRng};
    use crate::unit::StatusKind;

    fn use_ability(ctx: &mut ActionContext<'_>) -> Result<Vec<String>, ActionBlocked> {
        BattleAction::Ability(UseAbility).execute(ctx)
    }

    #[test]
    fn focus_boosts_attack_once() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        let mut rng = ScriptedRng::new([]);
        let lines = use_ability(&mut scenario.player_ctx(&mut rng)).unwrap();
        assert_eq!(lines, vec!["You use Focus.", "You are now focused."]);
        assert_eq!(scenario.familiar.attack(), 30);
        assert_eq!(scenario.familiar.mp(), scenario.familiar.max_mp() - 3);

        let err = use_ability(&mut scenario.player_ctx(&mut rng)).unwrap_err();
        assert_eq!(err.to_string(), "You are already focused.");
    }

    #[test]
    fn passive_weapon_cannot_be_used() {
        let mut scenario = Scenario::battle("Blazewing", 4, "Goblin", 1);
        let mut rng = ScriptedRng::new([]);
        let err = use_ability(&mut scenario.player_ctx(&mut rng)).unwrap_err();
        assert_eq!(err.to_string(), "Claws is always active.");
        assert_eq!(scenario.familiar.weapon_bonus(), 4);
    }

    #[test]
    fn mend_requires_missing_health() {
        let mut scenario = Scenario::battle("Puddle", 1, "Goblin", 1);
        let mut rng = ScriptedRng::new([]);
        let err = use_ability(&mut scenario.player_ctx(&mut rng)).unwrap_err();
        assert_eq!(err.to_string(), "You are already at full health.");

        scenario.familiar.take_damage(20);
        let lines = use_ability(&mut scenario.player_ctx(&mut rng)).unwrap();
        assert_eq!(lines[0], "You use Mend.");
        assert!(lines[1].starts_with("You recover"));
        assert!(scenario.familiar.hp() > scenario.familiar.max_hp() - 20);
    }

    #[test]
    fn purify_clears_only_debuffs() {
        let mut scenario = Scenario::battle("Ember", 1, "Cleanser", 1);
        let mut rng = ScriptedRng::new([]);
        let err = use_ability(&mut scenario.enemy_ctx(&mut rng)).unwrap_err();
        assert_eq!(err, ActionBlocked::NothingToCure);

        let statuses = scenario.enemy_mut().statuses_mut();
        statuses.apply(StatusKind::Poison, None);
        statuses.apply(StatusKind::FireProtection, Some(3));
        let lines = use_ability(&mut scenario.enemy_ctx(&mut rng)).unwrap();
        assert_eq!(lines, vec!["Cleanser uses Purify.", "Cleanser is no longer poisoned."]);
        assert!(scenario.enemy().has_status(StatusKind::FireProtection));
    }

    #[test]
    fn missing_ability_is_person_aware() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        let mut rng = ScriptedRng::new([]);
        let err = use_ability(&mut scenario.enemy_ctx(&mut rng)).unwrap_err();
        assert_eq!(err.to_string(), "Goblin doesn't have an ability.");
    }
}
