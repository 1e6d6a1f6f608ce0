//! Persisted form of a machine and its current state.
use std::collections::BTreeMap;

use super::state::{GameState, Resolution, StateKind};
use super::transition;
use crate::action::{BattleAction, CastSpell, PhysicalAttack, UseAbility, UseItem};
use crate::env::{CharacterKind, Env};
use crate::state::{ContextSnapshot, GameContext, SnapshotError};

/// Everything needed to resume a player's run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineSnapshot {
    pub version: u32,
    pub player_id: String,
    pub player_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_responses: Vec<String>,
    pub context: ContextSnapshot,
    pub state: StateSnapshot,
}

/// The current state tagged by its name, with its fields as strings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateSnapshot {
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub fields: BTreeMap<String, String>,
}

impl StateSnapshot {
    pub fn of(state: &GameState) -> Self {
        let mut fields = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            fields.insert(key.to_owned(), value);
        };
        match state {
            GameState::ChooseFamiliar { species } => put("species", species.clone()),
            GameState::EnterTower { ascend } => put("ascend", ascend.to_string()),
            GameState::UseItem { slot } | GameState::PrepareItem { slot } => {
                put("slot", slot.to_string());
            }
            GameState::PreparePhase { turn_used } => put("turn_used", turn_used.to_string()),
            GameState::PlayerAction { action } => {
                let name = match action {
                    BattleAction::Attack(_) => "attack",
                    BattleAction::Cast(_) => "cast",
                    BattleAction::Ability(_) => "ability",
                    BattleAction::Item(item) => {
                        put("slot", item.slot.to_string());
                        "item"
                    }
                };
                put("action", name.to_owned());
            }
            GameState::Trader { name } | GameState::Healer { name } | GameState::Sage { name } => {
                put("name", name.clone());
            }
            GameState::ResolveEvent { resolution } => {
                if let Resolution::Take { slot: Some(slot) } | Resolution::Trade { slot } =
                    resolution
                {
                    put("slot", slot.to_string());
                }
                put("resolution", resolution.name().to_owned());
            }
            GameState::GameOver { won } => put("won", won.to_string()),
            _ => {}
        }
        Self {
            name: state.kind().to_string(),
            fields,
        }
    }

    /// Rebuild the state against an already hydrated context.
    ///
    /// The name must be a key of the transition table (or the terminal
    /// state); every field is re-parsed and cross-checked with the context.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` on an unknown name, a malformed field, an
    /// unknown content reference or a state/context mismatch.
    pub fn hydrate(&self, ctx: &GameContext, env: &Env<'_>) -> Result<GameState, SnapshotError> {
        let kind = transition::kind_named(&self.name)
            .ok_or_else(|| SnapshotError::UnknownState(self.name.clone()))?;
        check_context(kind, ctx)?;

        let state = match kind {
            StateKind::Start => GameState::Start,
            StateKind::Initialize => GameState::Initialize,
            StateKind::ChooseFamiliar => {
                let species = self.text("species")?;
                env.unit(species)?;
                if !env
                    .tables()
                    .starters
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(species))
                {
                    return Err(self.invalid("species"));
                }
                GameState::ChooseFamiliar {
                    species: species.to_owned(),
                }
            }
            StateKind::EnterTower => GameState::EnterTower {
                ascend: self.flag("ascend")?,
            },
            StateKind::WaitForEvent => GameState::WaitForEvent,
            StateKind::UseItem => GameState::UseItem {
                slot: self.slot(ctx)?,
            },
            StateKind::GenerateEvent => GameState::GenerateEvent,
            StateKind::StartBattle => GameState::StartBattle,
            StateKind::PreparePhase => GameState::PreparePhase {
                turn_used: self.flag("turn_used")?,
            },
            StateKind::PrepareItem => GameState::PrepareItem {
                slot: self.slot(ctx)?,
            },
            StateKind::Approach => GameState::Approach,
            StateKind::Flee => GameState::Flee,
            StateKind::BattlePhase => GameState::BattlePhase,
            StateKind::PlayerTurn => GameState::PlayerTurn,
            StateKind::PlayerAction => {
                let action = match self.text("action")? {
                    "attack" => BattleAction::Attack(PhysicalAttack),
                    "cast" => BattleAction::Cast(CastSpell),
                    "ability" => BattleAction::Ability(UseAbility),
                    "item" => BattleAction::Item(UseItem::new(self.slot(ctx)?)),
                    _ => return Err(self.invalid("action")),
                };
                GameState::PlayerAction { action }
            }
            StateKind::EnemyTurn => GameState::EnemyTurn,
            StateKind::ConfusedTurn => GameState::ConfusedTurn,
            StateKind::SkipTurn => GameState::SkipTurn,
            StateKind::BattleFinished => GameState::BattleFinished,
            StateKind::ItemEvent => {
                require(ctx.item_buffer.is_some(), "item event without an item")?;
                GameState::ItemEvent
            }
            StateKind::TrapEvent => GameState::TrapEvent,
            StateKind::CharacterEvent => GameState::CharacterEvent,
            StateKind::Trader => {
                require(ctx.item_buffer.is_some(), "trader without an offer")?;
                GameState::Trader {
                    name: self.character(env, CharacterKind::Trader)?,
                }
            }
            StateKind::Healer => GameState::Healer {
                name: self.character(env, CharacterKind::Healer)?,
            },
            StateKind::Sage => GameState::Sage {
                name: self.character(env, CharacterKind::Sage)?,
            },
            StateKind::ElevatorEvent => GameState::ElevatorEvent,
            StateKind::FamiliarEvent => {
                require(ctx.unit_buffer.is_some(), "familiar event without a familiar")?;
                GameState::FamiliarEvent
            }
            StateKind::ResolveEvent => {
                let resolution = match self.text("resolution")? {
                    "take" => Resolution::Take {
                        slot: match self.fields.contains_key("slot") {
                            true => Some(self.slot(ctx)?),
                            false => None,
                        },
                    },
                    "trade" => Resolution::Trade {
                        slot: self.slot(ctx)?,
                    },
                    "heal" => Resolution::Heal,
                    "teach" => Resolution::Teach,
                    "recruit" => Resolution::Recruit,
                    _ => return Err(self.invalid("resolution")),
                };
                GameState::ResolveEvent { resolution }
            }
            StateKind::EventFinished => GameState::EventFinished,
            StateKind::GameOver => GameState::GameOver {
                won: self.flag("won")?,
            },
        };
        Ok(state)
    }

    fn invalid(&self, field: &'static str) -> SnapshotError {
        SnapshotError::InvalidField {
            field,
            value: self.fields.get(field).cloned().unwrap_or_default(),
        }
    }

    fn text(&self, field: &'static str) -> Result<&str, SnapshotError> {
        self.fields
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| self.invalid(field))
    }

    fn flag(&self, field: &'static str) -> Result<bool, SnapshotError> {
        self.text(field)?
            .parse()
            .map_err(|_| self.invalid(field))
    }

    fn slot(&self, ctx: &GameContext) -> Result<usize, SnapshotError> {
        let slot: usize = self.text("slot")?.parse().map_err(|_| self.invalid("slot"))?;
        if slot >= ctx.inventory.capacity() {
            return Err(SnapshotError::out_of_range("state.slot", slot as u64));
        }
        Ok(slot)
    }

    fn character(&self, env: &Env<'_>, kind: CharacterKind) -> Result<String, SnapshotError> {
        let character = env.character(self.text("name")?)?;
        if character.kind != kind {
            return Err(self.invalid("name"));
        }
        Ok(character.name.clone())
    }
}

fn require(condition: bool, what: &'static str) -> Result<(), SnapshotError> {
    if condition {
        Ok(())
    } else {
        Err(SnapshotError::Inconsistent(what))
    }
}

/// Familiar and battle presence must match the state.
fn check_context(kind: StateKind, ctx: &GameContext) -> Result<(), SnapshotError> {
    let before_familiar = matches!(
        kind,
        StateKind::Start | StateKind::Initialize | StateKind::ChooseFamiliar
    );
    require(
        before_familiar || ctx.familiar.is_some(),
        "state requires a familiar",
    )?;
    if kind.in_battle() {
        require(ctx.battle.is_some(), "battle state without a battle")?;
    } else if kind.waits() {
        require(ctx.battle.is_none(), "battle outside a battle state")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_registry;

    #[test]
    fn fields_round_trip_through_strings() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ctx = GameContext::new(3, env.tables());
        ctx.familiar = Some(crate::testing::unit(&env, "Ember", 1));

        for state in [
            GameState::EnterTower { ascend: true },
            GameState::UseItem { slot: 2 },
            GameState::GameOver { won: false },
            GameState::ResolveEvent {
                resolution: Resolution::Take { slot: Some(1) },
            },
            GameState::ResolveEvent {
                resolution: Resolution::Take { slot: None },
            },
            GameState::ResolveEvent {
                resolution: Resolution::Trade { slot: 0 },
            },
            GameState::Healer {
                name: "Cleric".to_owned(),
            },
        ] {
            let snapshot = StateSnapshot::of(&state);
            assert_eq!(snapshot.hydrate(&ctx, &env).unwrap(), state);
        }
    }

    #[test]
    fn corrupt_states_are_rejected() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ctx = GameContext::new(3, env.tables());

        let unknown = StateSnapshot {
            name: "dragon_lair".to_owned(),
            fields: BTreeMap::new(),
        };
        assert_eq!(
            unknown.hydrate(&ctx, &env),
            Err(SnapshotError::UnknownState("dragon_lair".to_owned()))
        );

        let no_familiar = StateSnapshot::of(&GameState::WaitForEvent);
        assert!(matches!(
            no_familiar.hydrate(&ctx, &env),
            Err(SnapshotError::Inconsistent(_))
        ));

        ctx.familiar = Some(crate::testing::unit(&env, "Ember", 1));
        let mut slot = StateSnapshot::of(&GameState::UseItem { slot: 0 });
        slot.fields.insert("slot".to_owned(), "9".to_owned());
        assert!(matches!(
            slot.hydrate(&ctx, &env),
            Err(SnapshotError::OutOfRange { .. })
        ));

        let battle = StateSnapshot::of(&GameState::PlayerTurn);
        assert!(matches!(
            battle.hydrate(&ctx, &env),
            Err(SnapshotError::Inconsistent(_))
        ));

        let wrong_role = StateSnapshot::of(&GameState::Sage {
            name: "Merchant".to_owned(),
        });
        assert!(matches!(
            wrong_role.hydrate(&ctx, &env),
            Err(SnapshotError::InvalidField { field: "name", .. })
        ));
    }
}
