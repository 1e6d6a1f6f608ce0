//! In-memory SaveRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use tower_core::MachineSnapshot;

use super::{RepositoryError, Result, SaveRepository};

/// Snapshots keyed by player id, lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemorySaveRepo {
    saves: RwLock<HashMap<String, MachineSnapshot>>,
}

impl InMemorySaveRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepo {
    fn load(&self, player_id: &str) -> Result<Option<MachineSnapshot>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.get(player_id).cloned())
    }

    fn save(&self, snapshot: &MachineSnapshot) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.insert(snapshot.player_id.clone(), snapshot.clone());
        Ok(())
    }

    fn delete(&self, player_id: &str) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.remove(player_id);
        Ok(())
    }

    fn exists(&self, player_id: &str) -> Result<bool> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.contains_key(player_id))
    }

    fn list_players(&self) -> Result<Vec<String>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = saves.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
