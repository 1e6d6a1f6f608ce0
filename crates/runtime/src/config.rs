//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by the orchestrator and its workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Directory holding the content catalogs and tables.
    pub data_dir: PathBuf,
    /// Where saves are written. `None` keeps them in memory.
    pub save_dir: Option<PathBuf>,
    /// Period of the event timer. Zero disables it.
    pub event_interval: Duration,
    /// How long a player who just got an event is deprioritized.
    pub participation_cooldown: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: tower_content::bundled_data_dir(),
            save_dir: None,
            event_interval: Duration::from_secs(30),
            participation_cooldown: Duration::from_secs(120),
            command_buffer_size: 32,
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TOWER_DATA_DIR` - Content directory (default: content shipped with `tower-content`)
    /// - `TOWER_SAVE_DIR` - Save directory (default: platform data directory)
    /// - `TOWER_EVENT_INTERVAL_SECS` - Event timer period, 0 disables (default: 30)
    /// - `TOWER_PARTICIPATION_COOLDOWN_SECS` - Participation penalty window (default: 120)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("TOWER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config.save_dir = env::var("TOWER_SAVE_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(default_save_dir);

        if let Some(secs) = read_env::<u64>("TOWER_EVENT_INTERVAL_SECS") {
            config.event_interval = Duration::from_secs(secs);
        }

        if let Some(secs) = read_env::<u64>("TOWER_PARTICIPATION_COOLDOWN_SECS") {
            config.participation_cooldown = Duration::from_secs(secs);
        }

        config
    }

    /// Whether the recurring event timer should run.
    pub fn timer_enabled(&self) -> bool {
        !self.event_interval.is_zero()
    }
}

/// Platform data directory, e.g. `~/.local/share/tower/saves` on Linux.
fn default_save_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tower").map(|dirs| dirs.data_dir().join("saves"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
