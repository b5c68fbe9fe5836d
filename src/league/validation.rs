use std::collections::HashSet;

use super::store::League;

/// Check a loaded league snapshot for broken invariants.
/// Returns all problems at once (not just the first).
///
/// Bets pointing at missing matches are not reported: standings skip them.
pub fn validate_league(league: &League) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut match_ids = HashSet::new();
    for (i, m) in league.matches.iter().enumerate() {
        if !match_ids.insert(m.id.as_str()) {
            errors.push(format!("matches[{}]: duplicate id '{}'", i, m.id));
        }

        if m.home_team == m.away_team {
            errors.push(format!(
                "matches[{}]: home and away team are both '{}'",
                i, m.home_team
            ));
        }

        let has_scores = m.home_score.is_some() && m.away_score.is_some();
        if m.is_finished() && !has_scores {
            errors.push(format!("matches[{}]: finished but scores are missing", i));
        }
        if !m.is_finished() && (m.home_score.is_some() || m.away_score.is_some()) {
            errors.push(format!("matches[{}]: scheduled but carries a score", i));
        }

        if let Some(ref winner) = m.penalty_winner {
            if !m.has_team(winner) {
                errors.push(format!(
                    "matches[{}].penaltyWinner: '{}' is not playing in {}",
                    i,
                    winner,
                    m.fixture()
                ));
            }
            if !m.is_knockout() {
                errors.push(format!(
                    "matches[{}].penaltyWinner: set on non-knockout stage '{}'",
                    i, m.group
                ));
            }
            if has_scores && m.home_score != m.away_score {
                errors.push(format!(
                    "matches[{}].penaltyWinner: set but the match was not a draw",
                    i
                ));
            }
        }
    }

    let mut user_ids = HashSet::new();
    let mut usernames = HashSet::new();
    for (i, u) in league.users.iter().enumerate() {
        if !user_ids.insert(u.id.as_str()) {
            errors.push(format!("users[{}]: duplicate id '{}'", i, u.id));
        }
        if !usernames.insert(u.username.as_str()) {
            errors.push(format!("users[{}]: duplicate username '{}'", i, u.username));
        }
    }

    let mut bet_keys = HashSet::new();
    for (i, b) in league.bets.iter().enumerate() {
        if !bet_keys.insert((b.match_id.as_str(), b.user_id.as_str())) {
            errors.push(format!(
                "bets[{}]: more than one bet from user '{}' on match '{}'",
                i, b.user_id, b.match_id
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
