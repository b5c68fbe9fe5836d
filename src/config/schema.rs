use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Betting closes this long before kickoff unless configured otherwise
pub const DEFAULT_BET_LOCK: &str = "1h";

/// CLI configuration.
///
/// Example YAML:
/// ```yaml
/// data_file: /home/me/leagues/world-cup.json
/// bet_lock: 30m
/// show_admins: false
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// League JSON file (default: ~/.config/bet-league/league.json)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// How long before kickoff betting closes, humantime format ("1h", "30m")
    #[serde(default)]
    pub bet_lock: Option<String>,

    /// List admins on the leaderboard too
    #[serde(default)]
    pub show_admins: Option<bool>,
}

impl Config {
    pub fn bet_lock_str(&self) -> &str {
        self.bet_lock.as_deref().unwrap_or(DEFAULT_BET_LOCK)
    }

    pub fn show_admins(&self) -> bool {
        self.show_admins.unwrap_or(false)
    }
}
