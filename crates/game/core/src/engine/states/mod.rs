//! Entry behaviour of every state.
//!
//! Entering a state narrates into the context's response buffer and, unless
//! the state waits, generates exactly one follow-up command.
mod battle;
mod events;
mod progression;

use super::errors::EngineError;
use super::state::GameState;
use crate::env::Env;
use crate::state::GameContext;

pub(super) fn enter(
    state: &GameState,
    ctx: &mut GameContext,
    env: &Env<'_>,
) -> Result<(), EngineError> {
    match state {
        GameState::Start => progression::start(ctx),
        GameState::Initialize => progression::initialize(ctx, env),
        GameState::ChooseFamiliar { species } => progression::choose_familiar(ctx, env, species),
        GameState::EnterTower { ascend } => progression::enter_tower(ctx, env, *ascend),
        GameState::WaitForEvent => progression::wait_for_event(ctx),
        GameState::UseItem { slot } => progression::use_item(ctx, env, *slot),
        GameState::GenerateEvent => progression::generate_event(ctx, env),
        GameState::EventFinished => progression::event_finished(ctx),
        GameState::GameOver { won } => progression::game_over(ctx, *won),

        GameState::StartBattle => battle::start_battle(ctx, env),
        GameState::PreparePhase { turn_used } => battle::prepare_phase(ctx, *turn_used),
        GameState::PrepareItem { slot } => battle::prepare_item(ctx, env, *slot),
        GameState::Approach => battle::approach(ctx),
        GameState::Flee => battle::flee(ctx, env),
        GameState::BattlePhase => battle::battle_phase(ctx),
        GameState::PlayerTurn => battle::player_turn(ctx),
        GameState::PlayerAction { action } => battle::player_action(ctx, env, action),
        GameState::EnemyTurn => battle::enemy_turn(ctx, env),
        GameState::ConfusedTurn => battle::confused_turn(ctx, env),
        GameState::SkipTurn => battle::skip_turn(ctx),
        GameState::BattleFinished => battle::battle_finished(ctx, env),

        GameState::ItemEvent => events::item_event(ctx, env),
        GameState::TrapEvent => events::trap_event(ctx, env),
        GameState::CharacterEvent => events::character_event(ctx, env),
        GameState::Trader { name } => events::trader(ctx, env, name),
        GameState::Healer { name } => events::healer(ctx, env, name),
        GameState::Sage { name } => events::sage(ctx, env, name),
        GameState::ElevatorEvent => events::elevator_event(ctx),
        GameState::FamiliarEvent => events::familiar_event(ctx, env),
        GameState::ResolveEvent { resolution } => events::resolve_event(ctx, env, *resolution),
    }
}

/// The prompt closing a waiting state's narration.
pub(super) fn prompt(ctx: &mut GameContext, options: &[&str]) {
    ctx.paragraph();
    ctx.say(format!("What will you do? ({})", options.join(", ")));
}
