/// Compile-time limits shared by the rules and the snapshot validator.
///
/// Tunable values (inventory capacity, flee chances, weight tables) live in
/// [`crate::env::Tables`]; the constants here bound what any content may ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    /// Hard upper bound on inventory slots regardless of configured capacity.
    pub const MAX_INVENTORY_SLOTS: usize = 8;

    /// Inventory capacity used when the tables do not override it.
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 5;

    /// Highest level a learned spell can reach.
    pub const MAX_SPELL_LEVEL: u8 = 3;

    /// Neutral stats boost percentage (no boost active).
    pub const NEUTRAL_BOOST: u32 = 100;

    /// Highest stats boost percentage a snapshot may carry.
    pub const MAX_BOOST: u32 = 300;

    /// Snapshot format version written by [`crate::engine::GameMachine::snapshot`].
    pub const SAVE_VERSION: u32 = 1;

    /// Upper bound on chained follow-up commands within a single `on_action` call.
    ///
    /// A battle can cascade through many automatic turns when the player is
    /// asleep, so the bound is generous; hitting it means a state loop.
    pub const MAX_CASCADE: usize = 512;

    /// Extra consecutive turns a Quick unit takes against a slower one.
    pub const MAX_SUB_TURN: u8 = 1;

    /// Share of max HP lost to poison each turn is `1 / POISON_DIVISOR`.
    pub const POISON_DIVISOR: u32 = 16;
}
