//! File-based SaveRepository implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tower_core::MachineSnapshot;

use super::{RepositoryError, Result, SaveRepository};

/// One pretty-printed JSON file per player.
///
/// # File Format
///
/// Saves are stored as `{player_id}.json`, with every character outside
/// `[A-Za-z0-9_-]` in the id replaced by `_`. Writes go to a temporary file
/// first and are renamed into place so a crash never leaves half a save.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    /// Create a repository rooted at `base_dir`, creating it if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the save file for `player_id`.
    pub fn save_path(&self, player_id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", file_stem(player_id)))
    }
}

fn file_stem(player_id: &str) -> String {
    player_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl SaveRepository for FileSaveRepository {
    fn load(&self, player_id: &str) -> Result<Option<MachineSnapshot>> {
        let path = self.save_path(player_id);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot: MachineSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json {
                player_id: player_id.to_owned(),
                message: e.to_string(),
            })?;

        tracing::debug!("Loaded save for {} from {}", player_id, path.display());

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &MachineSnapshot) -> Result<()> {
        let path = self.save_path(&snapshot.player_id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| RepositoryError::Json {
            player_id: snapshot.player_id.clone(),
            message: e.to_string(),
        })?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            "Saved {} to {}",
            snapshot.player_id,
            path.display()
        );

        Ok(())
    }

    fn delete(&self, player_id: &str) -> Result<()> {
        let path = self.save_path(player_id);

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted save for {}", player_id);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn exists(&self, player_id: &str) -> Result<bool> {
        Ok(self.save_path(player_id).exists())
    }

    fn list_players(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_owned());
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
