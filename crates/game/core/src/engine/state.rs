//! The active progression state.
//!
//! A [`GameState`] carries only what it needs to resume; everything else
//! lives in the [`GameContext`](crate::state::GameContext). [`StateKind`] is
//! its data-free discriminant, used as the transition table key and as the
//! tag in snapshots.
use crate::action::BattleAction;

/// Every named state of a run.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StateKind {
    Start,
    Initialize,
    ChooseFamiliar,
    EnterTower,
    WaitForEvent,
    UseItem,
    GenerateEvent,
    StartBattle,
    PreparePhase,
    PrepareItem,
    Approach,
    Flee,
    BattlePhase,
    PlayerTurn,
    PlayerAction,
    EnemyTurn,
    ConfusedTurn,
    SkipTurn,
    BattleFinished,
    ItemEvent,
    TrapEvent,
    CharacterEvent,
    Trader,
    Healer,
    Sage,
    ElevatorEvent,
    FamiliarEvent,
    ResolveEvent,
    EventFinished,
    GameOver,
}

impl StateKind {
    /// States that return control until the player sends a command.
    pub const fn waits_for_user(self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::Initialize
                | Self::PreparePhase
                | Self::PlayerTurn
                | Self::ItemEvent
                | Self::Trader
                | Self::Healer
                | Self::Sage
                | Self::ElevatorEvent
                | Self::FamiliarEvent
        )
    }

    /// States that return control until the event timer fires.
    pub const fn waits_for_event(self) -> bool {
        matches!(self, Self::WaitForEvent)
    }

    /// The only state allowed to have no transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }

    /// Whether entering the state may end a cascade.
    pub const fn waits(self) -> bool {
        self.waits_for_user() || self.waits_for_event() || self.is_terminal()
    }

    /// States that only make sense while a battle is active.
    pub const fn in_battle(self) -> bool {
        matches!(
            self,
            Self::PreparePhase
                | Self::PrepareItem
                | Self::Approach
                | Self::Flee
                | Self::BattlePhase
                | Self::PlayerTurn
                | Self::PlayerAction
                | Self::EnemyTurn
                | Self::ConfusedTurn
                | Self::SkipTurn
                | Self::BattleFinished
        )
    }
}

/// How an event is settled once the player has decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Pick up the buffered item, into a free slot or replacing `slot`.
    Take { slot: Option<usize> },
    /// Swap inventory `slot` for the trader's item.
    Trade { slot: usize },
    Heal,
    Teach,
    /// The buffered wild familiar replaces the current one.
    Recruit,
}

impl Resolution {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Take { .. } => "take",
            Self::Trade { .. } => "trade",
            Self::Heal => "heal",
            Self::Teach => "teach",
            Self::Recruit => "recruit",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Start,
    Initialize,
    ChooseFamiliar { species: String },
    EnterTower { ascend: bool },
    WaitForEvent,
    UseItem { slot: usize },
    GenerateEvent,
    StartBattle,
    /// `turn_used` is set when re-entered after spending a preparation turn.
    PreparePhase { turn_used: bool },
    PrepareItem { slot: usize },
    Approach,
    Flee,
    BattlePhase,
    PlayerTurn,
    PlayerAction { action: BattleAction },
    EnemyTurn,
    ConfusedTurn,
    SkipTurn,
    BattleFinished,
    ItemEvent,
    TrapEvent,
    CharacterEvent,
    Trader { name: String },
    Healer { name: String },
    Sage { name: String },
    ElevatorEvent,
    FamiliarEvent,
    ResolveEvent { resolution: Resolution },
    EventFinished,
    GameOver { won: bool },
}

impl GameState {
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Start => StateKind::Start,
            Self::Initialize => StateKind::Initialize,
            Self::ChooseFamiliar { .. } => StateKind::ChooseFamiliar,
            Self::EnterTower { .. } => StateKind::EnterTower,
            Self::WaitForEvent => StateKind::WaitForEvent,
            Self::UseItem { .. } => StateKind::UseItem,
            Self::GenerateEvent => StateKind::GenerateEvent,
            Self::StartBattle => StateKind::StartBattle,
            Self::PreparePhase { .. } => StateKind::PreparePhase,
            Self::PrepareItem { .. } => StateKind::PrepareItem,
            Self::Approach => StateKind::Approach,
            Self::Flee => StateKind::Flee,
            Self::BattlePhase => StateKind::BattlePhase,
            Self::PlayerTurn => StateKind::PlayerTurn,
            Self::PlayerAction { .. } => StateKind::PlayerAction,
            Self::EnemyTurn => StateKind::EnemyTurn,
            Self::ConfusedTurn => StateKind::ConfusedTurn,
            Self::SkipTurn => StateKind::SkipTurn,
            Self::BattleFinished => StateKind::BattleFinished,
            Self::ItemEvent => StateKind::ItemEvent,
            Self::TrapEvent => StateKind::TrapEvent,
            Self::CharacterEvent => StateKind::CharacterEvent,
            Self::Trader { .. } => StateKind::Trader,
            Self::Healer { .. } => StateKind::Healer,
            Self::Sage { .. } => StateKind::Sage,
            Self::ElevatorEvent => StateKind::ElevatorEvent,
            Self::FamiliarEvent => StateKind::FamiliarEvent,
            Self::ResolveEvent { .. } => StateKind::ResolveEvent,
            Self::EventFinished => StateKind::EventFinished,
            Self::GameOver { .. } => StateKind::GameOver,
        }
    }
}
