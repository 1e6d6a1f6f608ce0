//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use tower_core::Authority;

/// Who is playing and where logs go.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub player_id: String,
    pub player_name: String,
    /// Commands are issued with admin authority, which unlocks debug
    /// commands and `generate`.
    pub admin: bool,
    /// When set, logs are also written to a daily rolling file here.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_id: "local".to_owned(),
            player_name: "Adventurer".to_owned(),
            admin: false,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TOWER_PLAYER_ID` - Save slot and session key (default: local)
    /// - `TOWER_PLAYER_NAME` - Name used in narration (default: Adventurer)
    /// - `TOWER_ADMIN` - Issue commands as admin (default: false)
    /// - `TOWER_LOG_DIR` - Directory for rolling log files (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(id) = read_non_empty("TOWER_PLAYER_ID") {
            config.player_id = id;
        }
        if let Some(name) = read_non_empty("TOWER_PLAYER_NAME") {
            config.player_name = name;
        }
        if let Some(admin) = read_non_empty("TOWER_ADMIN") {
            config.admin = parse_flag(&admin);
        }
        config.log_dir = read_non_empty("TOWER_LOG_DIR").map(PathBuf::from);

        config
    }

    pub fn authority(&self) -> Authority {
        if self.admin {
            Authority::Admin
        } else {
            Authority::User
        }
    }
}

fn read_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn authority_follows_the_admin_flag() {
        let mut config = ClientConfig::default();
        assert_eq!(config.authority(), Authority::User);
        config.admin = true;
        assert_eq!(config.authority(), Authority::Admin);
    }
}
