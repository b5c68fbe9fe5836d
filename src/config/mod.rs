mod schema;

pub use schema::{Config, DEFAULT_BET_LOCK};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/bet-league/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("bet-league")
}

/// Get the default config file path (~/.config/bet-league/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/bet-league/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file is not an error: defaults are used.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref lock) = config.bet_lock {
        if let Err(e) = humantime::parse_duration(lock.trim()) {
            errors.push(format!("bet_lock: invalid duration '{}' - {}", lock, e));
        }
    }

    if let Some(ref data_file) = config.data_file {
        if data_file.as_os_str().is_empty() {
            errors.push("data_file: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Betting lock window before kickoff
pub fn bet_lock(config: &Config) -> Result<chrono::Duration> {
    let lock = config.bet_lock_str();
    let std_duration = humantime::parse_duration(lock.trim())
        .with_context(|| format!("Invalid bet_lock '{}'", lock))?;
    chrono::Duration::from_std(std_duration)
        .with_context(|| format!("bet_lock '{}' is out of range", lock))
}

/// League data file: explicit override, then config, then the default location
pub fn data_path(config: &Config, override_path: Option<PathBuf>) -> PathBuf {
    override_path
        .or_else(|| config.data_file.clone())
        .unwrap_or_else(crate::league::get_league_path)
}
