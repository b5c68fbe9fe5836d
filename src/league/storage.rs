use super::store::{League, LEAGUE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default league data file path (~/.config/bet-league/league.json)
pub fn get_league_path() -> PathBuf {
    crate::config::get_config_dir().join("league.json")
}

/// Load the league snapshot from a JSON file
///
/// If the file doesn't exist, returns a fresh league seeded with the default admin.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_league(path: &Path) -> Result<League> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no league file yet, starting fresh");
        return Ok(League::with_default_admin());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open league file at {}", path.display()))?;

    let league: League = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse league file at {}", path.display()))?;

    if league.version != LEAGUE_VERSION {
        anyhow::bail!("Unsupported league file version: {}", league.version);
    }

    tracing::debug!(
        matches = league.matches.len(),
        bets = league.bets.len(),
        users = league.users.len(),
        "league loaded"
    );
    Ok(league)
}

/// Save the league snapshot to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if needed.
pub fn save_league(path: &Path, league: &League) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, league).context("Failed to serialize league")?;

    file.commit().context("Failed to save league")?;

    tracing::debug!(path = %path.display(), "league saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::types::UserRole;
    use chrono::{Duration, Utc};
    use std::env;

    #[test]
    fn test_load_missing_file_seeds_admin() {
        let temp_path = env::temp_dir().join("bet_league_test_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let league = load_league(&temp_path).unwrap();
        assert_eq!(league.version, LEAGUE_VERSION);
        assert_eq!(league.users.len(), 1);
        assert!(league.users[0].is_admin());
        assert!(league.matches.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("bet_league_test_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut league = League::with_default_admin();
        let ana = league.register_user("Ana", "ana", UserRole::User).unwrap();
        let kickoff = Utc::now() + Duration::days(2);
        let game = league
            .add_match("Brazil", "Argentina", "Final", kickoff, None)
            .unwrap();
        league
            .place_bet(&ana, &game, 1, 1, Some("Brazil"), Utc::now(), Duration::hours(1))
            .unwrap();
        league.record_result(&game, 1, 1, Some("Brazil")).unwrap();

        save_league(&temp_path, &league).unwrap();
        let loaded = load_league(&temp_path).unwrap();

        assert_eq!(loaded, league);
        assert_eq!(loaded.find_user(&ana).unwrap().points, 10);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_unversioned_export() {
        let temp_path = env::temp_dir().join("bet_league_test_unversioned.json");
        let json = r#"{
            "matches": [{
                "id": "1718200000000",
                "homeTeam": "Brazil",
                "awayTeam": "Serbia",
                "date": "2026-06-12T16:00:00.000Z",
                "group": "Group G",
                "homeScore": 2,
                "awayScore": 0,
                "status": "FINISHED"
            }],
            "bets": [{
                "matchId": "1718200000000",
                "userId": "u1",
                "homeScore": 2,
                "awayScore": 0,
                "timestamp": "2026-06-10T10:00:00.000Z"
            }],
            "users": [{
                "id": "u1",
                "name": "Ana",
                "username": "ana",
                "password": "secret",
                "role": "USER",
                "points": 10
            }]
        }"#;
        std::fs::write(&temp_path, json).unwrap();

        let league = load_league(&temp_path).unwrap();
        assert_eq!(league.version, LEAGUE_VERSION);
        assert_eq!(league.matches[0].final_score(), Some((2, 0)));
        assert_eq!(league.bets.len(), 1);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let temp_path = env::temp_dir().join("bet_league_test_version.json");
        std::fs::write(&temp_path, r#"{"version": 7}"#).unwrap();

        let err = load_league(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported league file version"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
