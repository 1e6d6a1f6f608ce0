//! Enemy action choice.

use crate::action::{ActionView, BattleAction, CastSpell, PhysicalAttack, UnitAction};
use crate::env::RandomSource;
use crate::selection::weighted_index;

/// Pick the enemy's action with its species weights.
///
/// Actions that cannot be performed right now weigh zero. When nothing is
/// legal the enemy falls back to a plain attack, which always is.
pub fn choose_enemy_action(view: &ActionView<'_>, rng: &mut dyn RandomSource) -> BattleAction {
    let Some(enemy) = view.performer_unit() else {
        return BattleAction::Attack(PhysicalAttack);
    };
    let weights = enemy.traits().weights;
    let candidates = [
        (BattleAction::Attack(PhysicalAttack), weights.attack),
        (BattleAction::Cast(CastSpell), weights.spell),
    ];
    let table: Vec<u32> = candidates
        .iter()
        .map(|(action, weight)| {
            if action.as_action().can_perform(view).is_ok() {
                *weight
            } else {
                0
            }
        })
        .collect();
    match weighted_index(&table, rng) {
        Some(index) => candidates[index].0.clone(),
        None => BattleAction::Attack(PhysicalAttack),
    }
}
