//! Random action choice for confused units.

use super::Side;
use crate::action::{ActionView, BattleAction, CastSpell, PhysicalAttack, UnitAction, UseItem};
use crate::env::RandomSource;

/// What a confused unit ends up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfusedChoice {
    /// Wanders about and loses the turn.
    Skip,
    /// Performs `action` on `target`, whatever the target may be.
    Act {
        action: BattleAction,
        target: Option<Side>,
    },
}

/// Pick uniformly among skipping, attacking, casting (if possible) and,
/// for the player, using a random usable item. The target is then drawn
/// uniformly among the action's legal targets.
pub fn choose_confused_action(view: &ActionView<'_>, rng: &mut dyn RandomSource) -> ConfusedChoice {
    enum Pick {
        Skip,
        Act(BattleAction),
        Item,
    }

    let mut options = vec![Pick::Skip];
    if PhysicalAttack.can_perform(view).is_ok() {
        options.push(Pick::Act(BattleAction::Attack(PhysicalAttack)));
    }
    if CastSpell.can_perform(view).is_ok() {
        options.push(Pick::Act(BattleAction::Cast(CastSpell)));
    }
    let usable_slots: Vec<usize> = if view.performer == Side::Player {
        (0..view.inventory.len())
            .filter(|slot| UseItem::new(*slot).can_perform(view).is_ok())
            .collect()
    } else {
        Vec::new()
    };
    if !usable_slots.is_empty() {
        options.push(Pick::Item);
    }

    let pick = rng.below(options.len() as u32) as usize;
    let action = match options.swap_remove(pick) {
        Pick::Skip => return ConfusedChoice::Skip,
        Pick::Act(action) => action,
        Pick::Item => {
            let slot = usable_slots[rng.below(usable_slots.len() as u32) as usize];
            BattleAction::Item(UseItem::new(slot))
        }
    };

    let targets = action.as_action().legal_targets(view);
    let target = match targets.len() {
        0 => None,
        1 => targets[0],
        len => targets[rng.below(len as u32) as usize],
    };
    ConfusedChoice::Act { action, target }
}
