use super::{ActionBlocked, ActionContext, ActionView, UnitAction, check_mp};
use crate::battle::Side;
use crate::combat::{DefenseProfile, spell_damage};
use crate::env::SpellEffect;

/// Cast the performer's known spell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastSpell;

impl CastSpell {
    fn effect(view: &ActionView<'_>) -> Option<SpellEffect> {
        view.performer_unit()
            .and_then(|unit| unit.spell())
            .map(|spell| spell.traits.effect.clone())
    }
}

impl UnitAction for CastSpell {
    fn can_target_self(&self, view: &ActionView<'_>) -> bool {
        // Offensive spells reach the caster only through confusion or reflection.
        Self::effect(view).is_some()
    }

    fn can_target_other(&self, view: &ActionView<'_>) -> bool {
        Self::effect(view).is_some_and(|effect| !effect.targets_self())
    }

    fn select_target(&self, view: &ActionView<'_>) -> Option<Side> {
        let effect = Self::effect(view)?;
        if effect.targets_self() {
            return Some(view.performer);
        }
        let opponent = view.performer.opponent();
        view.unit(opponent).map(|_| opponent)
    }

    fn can_perform(&self, view: &ActionView<'_>) -> Result<(), ActionBlocked> {
        let Some(unit) = view.performer_unit() else {
            return Err(ActionBlocked::NoTarget);
        };
        let subject = unit.subject(view.performer);
        let Some(spell) = unit.spell() else {
            return Err(ActionBlocked::no_spell(&subject));
        };
        check_mp(unit, view.performer, spell.traits.mp_cost)?;
        match spell.traits.effect {
            SpellEffect::Heal { .. } if unit.hp() >= unit.max_hp() => {
                Err(ActionBlocked::full_health(&subject))
            }
            SpellEffect::Damage | SpellEffect::Inflict { .. }
                if view.unit(view.performer.opponent()).is_none() =>
            {
                Err(ActionBlocked::NoTarget)
            }
            _ => Ok(()),
        }
    }

    fn perform(&self, ctx: &mut ActionContext<'_>, target: Option<Side>) -> Vec<String> {
        let performer = ctx.performer;
        let Some(caster) = ctx.unit_mut(performer) else {
            return Vec::new();
        };
        let Some(spell) = caster.spell().cloned() else {
            return Vec::new();
        };
        caster.spend_mp(spell.traits.mp_cost);
        let caster_subject = caster.subject(performer);

        let mut parts = vec![format!(
            "{} {}.",
            caster_subject.says("cast", "casts"),
            spell.traits.name
        )];
        let Some(mut target) = target else {
            parts.push("It has no effect.".to_owned());
            return vec![parts.join(" ")];
        };

        let reflected = ctx
            .unit(target)
            .is_some_and(|unit| unit.statuses().reflects(spell.traits.genus));
        let bounce = if target == performer {
            performer.opponent()
        } else {
            performer
        };
        if reflected && ctx.unit(bounce).is_some() {
            let object = ctx
                .subject(bounce)
                .map(|subject| subject.object().to_owned())
                .unwrap_or_default();
            if bounce == performer {
                parts.push(format!("It is reflected back at {object}."));
            } else {
                parts.push(format!("It is reflected onto {object}."));
            }
            target = bounce;
        }

        let Some(target_subject) = ctx.subject(target) else {
            return vec![parts.join(" ")];
        };
        let shielded = target == Side::Player && ctx.holy_shield_active();
        let traits = &spell.traits;
        match &traits.effect {
            SpellEffect::Damage => {
                if shielded {
                    parts.push("The holy light shields you.".to_owned());
                } else {
                    let damage = ctx.unit(target).map_or(0, |unit| {
                        let defense = DefenseProfile::against(unit, traits.genus);
                        spell_damage(traits.power, spell.level, traits.genus, &defense)
                    });
                    let dealt = ctx.damage(target, damage);
                    parts.push(format!("It deals {dealt} damage."));
                    parts.extend(ctx.hp_left(target));
                }
            }
            SpellEffect::Inflict { status, turns, .. } => {
                let chance = traits.inflict_chance(spell.level);
                if shielded {
                    parts.push("The holy light shields you.".to_owned());
                } else if ctx.rng.percent(chance) {
                    if let Some(unit) = ctx.unit_mut(target) {
                        unit.statuses_mut().apply(*status, Some(*turns));
                    }
                    parts.push(status.applied_line(&target_subject));
                } else {
                    parts.push("It has no effect.".to_owned());
                }
            }
            SpellEffect::Protect { turns } | SpellEffect::Reflect { turns } => {
                match traits.granted_status() {
                    Some(kind) => {
                        if let Some(unit) = ctx.unit_mut(target) {
                            unit.statuses_mut().apply(kind, Some(*turns));
                        }
                        parts.push(kind.applied_line(&target_subject));
                    }
                    None => parts.push("It has no effect.".to_owned()),
                }
            }
            SpellEffect::Heal { .. } => {
                let amount = traits.heal_amount(spell.level);
                let healed = ctx.unit_mut(target).map_or(0, |unit| unit.heal(amount));
                parts.push(format!(
                    "{} {healed} HP.",
                    target_subject.says("recover", "recovers")
                ));
            }
        }
        vec![parts.join(" ")]
    }
}
