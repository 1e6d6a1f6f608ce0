//! Action precondition failures.
//!
//! The display text of every variant is the exact line shown to the player,
//! already conjugated for the performer.

use crate::error::{ErrorSeverity, GameError};
use crate::narration::Subject;

/// Why an action cannot be performed right now.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionBlocked {
    #[error("{lead} enough MP.")]
    NotEnoughMp { lead: String },

    #[error("{lead} know a spell.")]
    NoSpell { lead: String },

    #[error("{lead} have an ability.")]
    NoAbility { lead: String },

    #[error("{ability} is always active.")]
    PassiveAbility { ability: String },

    #[error("{lead} already at full health.")]
    FullHealth { lead: String },

    #[error("{lead} MP is already full.")]
    FullMp { lead: String },

    #[error("{lead} already focused.")]
    AlreadyFocused { lead: String },

    #[error("There is nothing to cure.")]
    NothingToCure,

    #[error("There is no item in slot {slot}.")]
    EmptySlot { slot: usize },

    #[error("{item} can only be used in battle.")]
    BattleOnly { item: String },

    #[error("{item} can't be used in battle.")]
    OutsideBattleOnly { item: String },

    #[error("The holy light is already shining.")]
    HolyScrollActive,

    #[error("{lead} already mastered {spell}.")]
    SpellMastered { lead: String, spell: String },

    #[error("There is nothing to target.")]
    NoTarget,
}

impl ActionBlocked {
    pub fn not_enough_mp(subject: &Subject) -> Self {
        Self::NotEnoughMp {
            lead: subject.says("don't have", "doesn't have"),
        }
    }

    pub fn no_spell(subject: &Subject) -> Self {
        Self::NoSpell {
            lead: subject.says("don't", "doesn't"),
        }
    }

    pub fn no_ability(subject: &Subject) -> Self {
        Self::NoAbility {
            lead: subject.says("don't", "doesn't"),
        }
    }

    pub fn full_health(subject: &Subject) -> Self {
        Self::FullHealth { lead: subject.is() }
    }

    pub fn full_mp(subject: &Subject) -> Self {
        Self::FullMp {
            lead: subject.possessive(),
        }
    }

    pub fn already_focused(subject: &Subject) -> Self {
        Self::AlreadyFocused { lead: subject.is() }
    }

    pub fn spell_mastered(subject: &Subject, spell: &str) -> Self {
        Self::SpellMastered {
            lead: subject.says("have", "has"),
            spell: spell.to_owned(),
        }
    }
}

impl GameError for ActionBlocked {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughMp { .. } => "ACTION_NOT_ENOUGH_MP",
            Self::NoSpell { .. } => "ACTION_NO_SPELL",
            Self::NoAbility { .. } => "ACTION_NO_ABILITY",
            Self::PassiveAbility { .. } => "ACTION_PASSIVE_ABILITY",
            Self::FullHealth { .. } => "ACTION_FULL_HEALTH",
            Self::FullMp { .. } => "ACTION_FULL_MP",
            Self::AlreadyFocused { .. } => "ACTION_ALREADY_FOCUSED",
            Self::NothingToCure => "ACTION_NOTHING_TO_CURE",
            Self::EmptySlot { .. } => "ACTION_EMPTY_SLOT",
            Self::BattleOnly { .. } => "ACTION_BATTLE_ONLY",
            Self::OutsideBattleOnly { .. } => "ACTION_OUTSIDE_BATTLE_ONLY",
            Self::HolyScrollActive => "ACTION_HOLY_SCROLL_ACTIVE",
            Self::SpellMastered { .. } => "ACTION_SPELL_MASTERED",
            Self::NoTarget => "ACTION_NO_TARGET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_person_aware() {
        let you = Subject::player("Ember");
        let goblin = Subject::other("Goblin");
        assert_eq!(
            ActionBlocked::not_enough_mp(&you).to_string(),
            "You don't have enough MP."
        );
        assert_eq!(
            ActionBlocked::not_enough_mp(&goblin).to_string(),
            "Goblin doesn't have enough MP."
        );
        assert_eq!(
            ActionBlocked::full_health(&you).to_string(),
            "You are already at full health."
        );
        assert_eq!(ActionBlocked::full_mp(&goblin).to_string(), "Goblin's MP is already full.");
    }
}
