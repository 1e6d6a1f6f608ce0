use super::{ActionBlocked, ActionContext, ActionView, UnitAction};
use crate::battle::Side;
use crate::config::GameConfig;
use crate::env::{ItemBehavior, ItemTraits};

/// Use the item in an inventory slot (0-based; players see it 1-based).
///
/// Only the player's side carries an inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UseItem {
    pub slot: usize,
}

impl UseItem {
    pub const fn new(slot: usize) -> Self {
        Self { slot }
    }

    fn behavior<'v>(&self, view: &ActionView<'v>) -> Option<&'v ItemBehavior> {
        if view.performer != Side::Player {
            return None;
        }
        view.inventory.get(self.slot).map(|item| &item.behavior)
    }
}

impl UnitAction for UseItem {
    fn can_target_self(&self, view: &ActionView<'_>) -> bool {
        self.behavior(view).is_some_and(|behavior| {
            !matches!(behavior, ItemBehavior::Bomb { .. } | ItemBehavior::SmokeBomb)
        })
    }

    fn can_target_other(&self, view: &ActionView<'_>) -> bool {
        matches!(self.behavior(view), Some(ItemBehavior::Bomb { .. }))
    }

    fn can_target_none(&self, view: &ActionView<'_>) -> bool {
        matches!(self.behavior(view), Some(ItemBehavior::SmokeBomb))
    }

    fn select_target(&self, view: &ActionView<'_>) -> Option<Side> {
        match self.behavior(view)? {
            ItemBehavior::SmokeBomb => None,
            ItemBehavior::Bomb { .. } => Some(view.performer.opponent()),
            _ => Some(view.performer),
        }
    }

    fn can_perform(&self, view: &ActionView<'_>) -> Result<(), ActionBlocked> {
        if view.performer != Side::Player {
            return Err(ActionBlocked::NoTarget);
        }
        let Some(item) = view.inventory.get(self.slot) else {
            return Err(ActionBlocked::EmptySlot {
                slot: self.slot + 1,
            });
        };
        if view.in_battle() && !item.behavior.usable_in_battle() {
            return Err(ActionBlocked::OutsideBattleOnly {
                item: item.name.clone(),
            });
        }
        if !view.in_battle() && !item.behavior.usable_outside_battle() {
            return Err(ActionBlocked::BattleOnly {
                item: item.name.clone(),
            });
        }

        let unit = view.familiar;
        let subject = unit.subject(Side::Player);
        match &item.behavior {
            ItemBehavior::RestoreHp { .. } if unit.hp() >= unit.max_hp() => {
                Err(ActionBlocked::full_health(&subject))
            }
            ItemBehavior::RestoreMp { .. } if unit.mp() >= unit.max_mp() => {
                Err(ActionBlocked::full_mp(&subject))
            }
            ItemBehavior::Elixir if unit.hp() >= unit.max_hp() && unit.mp() >= unit.max_mp() => {
                Err(ActionBlocked::full_health(&subject))
            }
            ItemBehavior::Cure if !unit.statuses().iter().any(|kind| kind.is_debuff()) => {
                Err(ActionBlocked::NothingToCure)
            }
            ItemBehavior::HolyScroll { .. }
                if view.battle.is_some_and(|battle| battle.holy_scroll > 0) =>
            {
                Err(ActionBlocked::HolyScrollActive)
            }
            ItemBehavior::Bomb { .. } if view.unit(Side::Enemy).is_none() => {
                Err(ActionBlocked::NoTarget)
            }
            ItemBehavior::Tome { spell } => match unit.spell() {
                Some(known)
                    if known.traits.name.eq_ignore_ascii_case(spell)
                        && known.level >= GameConfig::MAX_SPELL_LEVEL =>
                {
                    Err(ActionBlocked::spell_mastered(&subject, &known.traits.name))
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn perform(&self, ctx: &mut ActionContext<'_>, target: Option<Side>) -> Vec<String> {
        let Some(item) = ctx.inventory.remove(self.slot) else {
            return Vec::new();
        };
        let subject = ctx.familiar.subject(Side::Player);
        let mut lines = vec![format!("{} {}.", subject.says("use", "uses"), item.name)];
        lines.extend(apply(ctx, &item, target));
        lines
    }
}

fn apply(ctx: &mut ActionContext<'_>, item: &ItemTraits, target: Option<Side>) -> Vec<String> {
    let subject = ctx.familiar.subject(Side::Player);
    let mut lines = Vec::new();
    match &item.behavior {
        ItemBehavior::RestoreHp { amount } => {
            let healed = ctx.familiar.heal(*amount);
            lines.push(format!("{} {healed} HP.", subject.says("recover", "recovers")));
        }
        ItemBehavior::RestoreMp { amount } => {
            let restored = ctx.familiar.restore_mp(*amount);
            lines.push(format!("{} {restored} MP.", subject.says("recover", "recovers")));
        }
        ItemBehavior::Cure => {
            for kind in ctx.familiar.statuses_mut().clear_debuffs() {
                lines.push(kind.cleared_line(&subject));
            }
        }
        ItemBehavior::Elixir => {
            ctx.familiar.restore_all();
            lines.push(format!("{} fully restored.", subject.is()));
        }
        ItemBehavior::HolyScroll { turns } => {
            if let Some(battle) = ctx.battle.as_deref_mut() {
                battle.holy_scroll = *turns;
                lines.push("A holy light surrounds you.".to_owned());
            }
        }
        ItemBehavior::Bomb { damage } => {
            let Some(target) = target else {
                return lines;
            };
            let dealt = ctx.damage(target, *damage);
            let mut line = format!("It explodes dealing {dealt} damage.");
            if let Some(left) = ctx.hp_left(target) {
                line = format!("{line} {left}");
            }
            lines.push(line);
        }
        ItemBehavior::SmokeBomb => {
            if let Some(battle) = ctx.battle.as_deref_mut() {
                battle.finished = true;
                battle.fled = true;
                lines.push("Smoke fills the air and you slip away.".to_owned());
            }
        }
        ItemBehavior::Tome { spell } => {
            let Ok(traits) = ctx.env.spell(spell) else {
                lines.push("The pages are blank.".to_owned());
                return lines;
            };
            let previous = ctx
                .familiar
                .spell()
                .map(|known| known.traits.name.clone());
            match (previous, ctx.familiar.learn_spell(traits.clone())) {
                (_, None) => {}
                (Some(old), Some(level)) if old == traits.name => lines.push(format!(
                    "{} {} grew to level {level}!",
                    subject.possessive(),
                    traits.name
                )),
                (Some(old), Some(_)) => lines.push(format!(
                    "{} {old} and {} {}!",
                    subject.says("forget", "forgets"),
                    subject.verb("learn", "learns"),
                    traits.name
                )),
                (None, Some(_)) => lines.push(format!(
                    "{} {}!",
                    subject.says("learn", "learns"),
                    traits.name
                )),
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::BattleAction;
    use crate::testing::{Scenario, ScriptedRng};
    use crate::unit::StatusKind;

    fn use_slot(ctx: &mut ActionContext<'_>, slot: usize) -> Result<Vec<String>, ActionBlocked> {
        BattleAction::Item(UseItem::new(slot)).execute(ctx)
    }

    #[test]
    fn potion_heals_and_is_consumed() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.give("Potion");
        let mut rng = ScriptedRng::new([]);
        let err = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap_err();
        assert_eq!(err.to_string(), "You are already at full health.");
        assert_eq!(scenario.inventory.len(), 1);

        scenario.familiar.take_damage(10);
        let lines = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap();
        assert_eq!(lines, vec!["You use Potion.", "You recover 10 HP."]);
        assert!(scenario.inventory.is_empty());
    }

    #[test]
    fn empty_slot_is_reported_one_based() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        let mut rng = ScriptedRng::new([]);
        let err = use_slot(&mut scenario.player_ctx(&mut rng), 2).unwrap_err();
        assert_eq!(err.to_string(), "There is no item in slot 3.");
    }

    #[test]
    fn bomb_ignores_defense_and_needs_a_battle() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.give("Bomb");
        let mut rng = ScriptedRng::new([]);
        let lines = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap();
        assert_eq!(
            lines,
            vec!["You use Bomb.", "It explodes dealing 25 damage. Goblin has 15 HP left."]
        );

        scenario.give("Bomb");
        let err = use_slot(&mut scenario.outside_ctx(&mut rng), 0).unwrap_err();
        assert_eq!(err.to_string(), "Bomb can only be used in battle.");
    }

    #[test]
    fn holy_scroll_cannot_stack() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.give("Holy Scroll");
        scenario.give("Holy Scroll");
        let mut rng = ScriptedRng::new([]);
        use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap();
        assert_eq!(scenario.battle.holy_scroll, 3);
        let err = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap_err();
        assert_eq!(err, ActionBlocked::HolyScrollActive);
    }

    #[test]
    fn smoke_bomb_ends_the_battle() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.give("Smoke Bomb");
        let mut rng = ScriptedRng::new([]);
        use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap();
        assert!(scenario.battle.finished);
        assert!(scenario.battle.fled);
    }

    #[test]
    fn antidote_needs_a_debuff() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        scenario.give("Antidote");
        let mut rng = ScriptedRng::new([]);
        let err = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap_err();
        assert_eq!(err, ActionBlocked::NothingToCure);

        scenario.familiar.statuses_mut().apply(StatusKind::Poison, None);
        let lines = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap();
        assert_eq!(lines[1], "You are no longer poisoned.");
    }

    #[test]
    fn tome_replaces_then_trains_then_masters() {
        let mut scenario = Scenario::battle("Ember", 1, "Goblin", 1);
        for _ in 0..4 {
            scenario.give("Tome of Tides");
        }
        let mut rng = ScriptedRng::new([]);
        let err = use_slot(&mut scenario.player_ctx(&mut rng), 0).unwrap_err();
        assert_eq!(err.to_string(), "Tome of Tides can't be used in battle.");

        let lines = use_slot(&mut scenario.outside_ctx(&mut rng), 0).unwrap();
        assert_eq!(lines[1], "You forget Fireball and learn Tidal Wave!");
        let lines = use_slot(&mut scenario.outside_ctx(&mut rng), 0).unwrap();
        assert_eq!(lines[1], "Your Tidal Wave grew to level 2!");
        use_slot(&mut scenario.outside_ctx(&mut rng), 0).unwrap();
        let err = use_slot(&mut scenario.outside_ctx(&mut rng), 0).unwrap_err();
        assert_eq!(err.to_string(), "You have already mastered Tidal Wave.");
        assert_eq!(scenario.inventory.len(), 1);
    }
}
