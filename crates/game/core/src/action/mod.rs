//! Unit actions: physical attack, spell cast, ability use and item use.
//!
//! Every variant implements [`UnitAction`]. The battle engine builds menus,
//! validates player choices, weights the enemy AI and resolves confused turns
//! through that one contract without knowing the concrete variant.
//!
//! Checks run against a read-only [`ActionView`]; resolution mutates through
//! an [`ActionContext`] and returns the narrated lines.
mod ability;
mod attack;
mod error;
mod item;
mod spell;

pub use ability::UseAbility;
pub use attack::PhysicalAttack;
pub use error::ActionBlocked;
pub use item::UseItem;
pub use spell::CastSpell;

use crate::battle::{BattleContext, Side};
use crate::env::{Env, RandomSource};
use crate::narration::Subject;
use crate::state::Inventory;
use crate::unit::Unit;

// ============================================================================
// Contract
// ============================================================================

/// Uniform contract implemented by every action variant.
pub trait UnitAction {
    /// Whether the performer may be the target.
    fn can_target_self(&self, view: &ActionView<'_>) -> bool;

    /// Whether the opponent may be the target.
    fn can_target_other(&self, view: &ActionView<'_>) -> bool;

    /// Whether the action resolves without a target.
    fn can_target_none(&self, _view: &ActionView<'_>) -> bool {
        false
    }

    /// Natural target for a deliberate use: the opponent when allowed and
    /// present, otherwise the performer, otherwise nobody.
    fn select_target(&self, view: &ActionView<'_>) -> Option<Side> {
        let opponent = view.performer.opponent();
        if self.can_target_other(view) && view.unit(opponent).is_some() {
            Some(opponent)
        } else if self.can_target_self(view) {
            Some(view.performer)
        } else {
            None
        }
    }

    /// Every legal target shape, used for confused turns.
    fn legal_targets(&self, view: &ActionView<'_>) -> Vec<Option<Side>> {
        let mut targets = Vec::new();
        if self.can_target_self(view) {
            targets.push(Some(view.performer));
        }
        let opponent = view.performer.opponent();
        if self.can_target_other(view) && view.unit(opponent).is_some() {
            targets.push(Some(opponent));
        }
        if self.can_target_none(view) {
            targets.push(None);
        }
        targets
    }

    /// Precondition check; the error text is shown to the player verbatim.
    fn can_perform(&self, view: &ActionView<'_>) -> Result<(), ActionBlocked>;

    /// Resolve the action on `target`. Assumes `can_perform` passed.
    fn perform(&self, ctx: &mut ActionContext<'_>, target: Option<Side>) -> Vec<String>;
}

/// Shared check for MP-costing variants.
pub(crate) fn check_mp(unit: &Unit, side: Side, cost: u32) -> Result<(), ActionBlocked> {
    if unit.mp() < cost {
        return Err(ActionBlocked::not_enough_mp(&unit.subject(side)));
    }
    Ok(())
}

// ============================================================================
// Closed set of variants
// ============================================================================

/// One concrete action chosen for a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleAction {
    Attack(PhysicalAttack),
    Cast(CastSpell),
    Ability(UseAbility),
    Item(UseItem),
}

impl BattleAction {
    pub fn as_action(&self) -> &dyn UnitAction {
        match self {
            Self::Attack(action) => action,
            Self::Cast(action) => action,
            Self::Ability(action) => action,
            Self::Item(action) => action,
        }
    }

    /// Check and resolve against the natural target.
    ///
    /// # Errors
    ///
    /// Returns the precondition failure without touching any state.
    pub fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<Vec<String>, ActionBlocked> {
        let action = self.as_action();
        let target = {
            let view = ctx.view();
            action.can_perform(&view)?;
            action.select_target(&view)
        };
        Ok(action.perform(ctx, target))
    }
}

// ============================================================================
// View and context
// ============================================================================

/// Read-only view of everything an action may inspect.
#[derive(Clone, Copy, Debug)]
pub struct ActionView<'a> {
    pub performer: Side,
    pub familiar: &'a Unit,
    pub battle: Option<&'a BattleContext>,
    pub inventory: &'a Inventory,
}

impl<'a> ActionView<'a> {
    pub fn new(
        performer: Side,
        familiar: &'a Unit,
        battle: Option<&'a BattleContext>,
        inventory: &'a Inventory,
    ) -> Self {
        Self {
            performer,
            familiar,
            battle,
            inventory,
        }
    }

    pub fn unit(&self, side: Side) -> Option<&'a Unit> {
        match side {
            Side::Player => Some(self.familiar),
            Side::Enemy => self.battle.map(|battle| &battle.enemy),
        }
    }

    pub fn performer_unit(&self) -> Option<&'a Unit> {
        self.unit(self.performer)
    }

    pub fn in_battle(&self) -> bool {
        self.battle.is_some()
    }
}

/// Mutable access used while an action resolves.
pub struct ActionContext<'a> {
    pub performer: Side,
    pub familiar: &'a mut Unit,
    pub battle: Option<&'a mut BattleContext>,
    pub inventory: &'a mut Inventory,
    pub env: Env<'a>,
    pub rng: &'a mut dyn RandomSource,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        performer: Side,
        familiar: &'a mut Unit,
        battle: Option<&'a mut BattleContext>,
        inventory: &'a mut Inventory,
        env: Env<'a>,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            performer,
            familiar,
            battle,
            inventory,
            env,
            rng,
        }
    }

    pub fn view(&self) -> ActionView<'_> {
        ActionView::new(
            self.performer,
            &*self.familiar,
            self.battle.as_deref(),
            &*self.inventory,
        )
    }

    pub fn unit(&self, side: Side) -> Option<&Unit> {
        match side {
            Side::Player => Some(&*self.familiar),
            Side::Enemy => self.battle.as_deref().map(|battle| &battle.enemy),
        }
    }

    pub fn unit_mut(&mut self, side: Side) -> Option<&mut Unit> {
        match side {
            Side::Player => Some(&mut *self.familiar),
            Side::Enemy => self.battle.as_deref_mut().map(|battle| &mut battle.enemy),
        }
    }

    pub fn subject(&self, side: Side) -> Option<Subject> {
        self.unit(side).map(|unit| unit.subject(side))
    }

    /// Apply `amount` damage to `side`, honouring the holy scroll shield.
    ///
    /// Returns the HP actually lost (0 while the player is shielded).
    pub fn damage(&mut self, side: Side, amount: u32) -> u32 {
        let shielded = side == Side::Player
            && self
                .battle
                .as_deref()
                .is_some_and(BattleContext::shields_player);
        if shielded {
            return 0;
        }
        self.unit_mut(side).map_or(0, |unit| unit.take_damage(amount))
    }

    /// "Goblin has 22 HP left." / "You have 22 HP left."
    pub fn hp_left(&self, side: Side) -> Option<String> {
        let unit = self.unit(side)?;
        let subject = unit.subject(side);
        Some(format!(
            "{} {} HP left.",
            subject.says("have", "has"),
            unit.hp()
        ))
    }

    pub fn holy_shield_active(&self) -> bool {
        self.battle
            .as_deref()
            .is_some_and(BattleContext::shields_player)
    }
}
