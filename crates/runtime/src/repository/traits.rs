//! Repository contract for saving and loading sessions.

use tower_core::MachineSnapshot;

use super::Result;

/// Load/save/delete by player id.
///
/// Implementations are called from the session worker only, once after each
/// fully resolved command.
pub trait SaveRepository: Send + Sync {
    fn load(&self, player_id: &str) -> Result<Option<MachineSnapshot>>;

    fn save(&self, snapshot: &MachineSnapshot) -> Result<()>;

    /// Deleting a missing save is not an error.
    fn delete(&self, player_id: &str) -> Result<()>;

    fn exists(&self, player_id: &str) -> Result<bool> {
        Ok(self.load(player_id)?.is_some())
    }

    /// Ids of every stored session.
    fn list_players(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
