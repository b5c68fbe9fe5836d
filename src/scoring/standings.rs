use std::collections::HashMap;

use super::engine::{score_bet, ScoreResult};
use crate::league::types::{Bet, Match, User, UserRole};

/// Rebuild every user's point total from scratch.
///
/// Each user's `points` becomes the sum of [`score_bet`] over their bets on
/// finished matches. Bets on scheduled or missing matches contribute nothing.
/// The input order of `users` is preserved.
pub fn recompute_standings(matches: &[Match], bets: &[Bet], users: &[User]) -> Vec<User> {
    let totals = point_totals(matches, bets);

    users
        .iter()
        .map(|user| User {
            points: totals.get(user.id.as_str()).copied().unwrap_or(0),
            ..user.clone()
        })
        .collect()
}

/// Points per user id, over finished matches only
pub fn point_totals<'a>(matches: &[Match], bets: &'a [Bet]) -> HashMap<&'a str, u32> {
    let finished: HashMap<&str, &Match> = matches
        .iter()
        .filter(|m| m.is_finished())
        .map(|m| (m.id.as_str(), m))
        .collect();

    let mut totals = HashMap::new();
    for bet in bets {
        if let Some(m) = finished.get(bet.match_id.as_str()) {
            *totals.entry(bet.user_id.as_str()).or_insert(0) += score_bet(bet, m).points;
        }
    }
    totals
}

/// Count bets whose match no longer exists
pub fn count_dangling_bets(matches: &[Match], bets: &[Bet]) -> usize {
    bets.iter()
        .filter(|b| !matches.iter().any(|m| m.id == b.match_id))
        .count()
}

/// Ranked players, highest points first.
///
/// Admins are left out unless `include_admins` is set. Ties keep the
/// original listing order.
pub fn leaderboard(users: &[User], include_admins: bool) -> Vec<&User> {
    let mut ranked: Vec<&User> = users
        .iter()
        .filter(|u| include_admins || u.role == UserRole::User)
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.points.cmp(&a.points));
    ranked
}

/// One bet of a user alongside its match and how it scored
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
    pub game: &'a Match,
    pub bet: &'a Bet,
    pub result: ScoreResult,
}

/// Every bet of `user_id` that still has a match, in kickoff order
pub fn audit_user<'a>(matches: &'a [Match], bets: &'a [Bet], user_id: &str) -> Vec<AuditEntry<'a>> {
    let mut entries: Vec<AuditEntry<'a>> = bets
        .iter()
        .filter(|b| b.user_id == user_id)
        .filter_map(|bet| {
            let game = matches.iter().find(|m| m.id == bet.match_id)?;
            Some(AuditEntry {
                game,
                bet,
                result: score_bet(bet, game),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.game.date.cmp(&b.game.date));
    entries
}

/// A bet on one match together with the player who placed it
#[derive(Debug, Clone)]
pub struct MatchBetEntry<'a> {
    pub user: &'a User,
    pub bet: &'a Bet,
    pub result: ScoreResult,
}

/// All bets on `game`, highest scoring first, ties in user listing order.
/// Bets from unknown users are skipped.
pub fn match_bets<'a>(users: &'a [User], bets: &'a [Bet], game: &Match) -> Vec<MatchBetEntry<'a>> {
    let mut entries: Vec<MatchBetEntry<'a>> = users
        .iter()
        .filter_map(|user| {
            let bet = bets
                .iter()
                .find(|b| b.match_id == game.id && b.user_id == user.id)?;
            Some(MatchBetEntry {
                user,
                bet,
                result: score_bet(bet, game),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.result.points.cmp(&a.result.points));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::types::MatchStatus;
    use chrono::{Duration, Utc};

    fn game(id: &str, group: &str, score: Option<(u32, u32)>) -> Match {
        Match {
            id: id.to_string(),
            home_team: "Brazil".to_string(),
            away_team: "Argentina".to_string(),
            date: Utc::now(),
            group: group.to_string(),
            description: None,
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
            penalty_winner: None,
            status: if score.is_some() {
                MatchStatus::Finished
            } else {
                MatchStatus::Scheduled
            },
        }
    }

    fn bet(match_id: &str, user_id: &str, home: u32, away: u32) -> Bet {
        Bet {
            match_id: match_id.to_string(),
            user_id: user_id.to_string(),
            home_score: home,
            away_score: away,
            penalty_winner: None,
            timestamp: Utc::now(),
        }
    }

    fn user(id: &str, role: UserRole, points: u32) -> User {
        User {
            id: id.to_string(),
            name: id.to_uppercase(),
            username: id.to_string(),
            role,
            points,
        }
    }

    #[test]
    fn test_recompute_sums_finished_matches() {
        let matches = vec![
            game("m1", "Group A", Some((2, 1))),
            game("m2", "Group A", Some((3, 0))),
            game("m3", "Group A", None),
        ];
        let bets = vec![
            bet("m1", "ana", 2, 1), // 10
            bet("m2", "ana", 2, 0), // 8
            bet("m3", "ana", 1, 0), // scheduled, 0
            bet("m1", "bob", 0, 0), // 0
        ];
        let users = vec![user("ana", UserRole::User, 0), user("bob", UserRole::User, 99)];

        let updated = recompute_standings(&matches, &bets, &users);
        assert_eq!(updated[0].points, 18);
        assert_eq!(updated[1].points, 0); // Stale cache replaced, not added to
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let matches = vec![game("m1", "Group A", Some((1, 1)))];
        let bets = vec![bet("m1", "ana", 0, 0), bet("m1", "bob", 1, 1)];
        let users = vec![user("ana", UserRole::User, 0), user("bob", UserRole::User, 0)];

        let once = recompute_standings(&matches, &bets, &users);
        let twice = recompute_standings(&matches, &bets, &once);
        assert_eq!(once, twice);
        assert_eq!(twice[0].points, 2);
        assert_eq!(twice[1].points, 10);
    }

    #[test]
    fn test_recompute_ignores_dangling_bets() {
        let matches = vec![game("m1", "Group A", Some((1, 0)))];
        let bets = vec![bet("m1", "ana", 1, 0), bet("gone", "ana", 5, 5)];
        let users = vec![user("ana", UserRole::User, 0)];

        let updated = recompute_standings(&matches, &bets, &users);
        assert_eq!(updated[0].points, 10);
        assert_eq!(count_dangling_bets(&matches, &bets), 1);
    }

    #[test]
    fn test_recompute_user_without_bets() {
        let users = vec![user("ana", UserRole::User, 7)];
        let updated = recompute_standings(&[], &[], &users);
        assert_eq!(updated[0].points, 0);
    }

    #[test]
    fn test_leaderboard_sorted_and_stable() {
        let users = vec![
            user("ana", UserRole::User, 5),
            user("bob", UserRole::User, 12),
            user("cid", UserRole::User, 5),
            user("dan", UserRole::User, 20),
        ];
        let ranked: Vec<&str> = leaderboard(&users, false)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["dan", "bob", "ana", "cid"]);
    }

    #[test]
    fn test_leaderboard_hides_admins() {
        let users = vec![
            user("admin", UserRole::Admin, 50),
            user("ana", UserRole::User, 5),
        ];
        assert_eq!(leaderboard(&users, false).len(), 1);
        assert_eq!(leaderboard(&users, true)[0].id, "admin");
    }

    #[test]
    fn test_audit_orders_by_kickoff() {
        let mut early = game("m1", "Group A", Some((1, 0)));
        early.date = Utc::now() - Duration::days(2);
        let late = game("m2", "Group A", None);
        let matches = vec![late, early];
        let bets = vec![
            bet("m2", "ana", 1, 1),
            bet("m1", "ana", 1, 0),
            bet("m1", "bob", 1, 0),
            bet("gone", "ana", 0, 0),
        ];

        let entries = audit_user(&matches, &bets, "ana");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].game.id, "m1");
        assert_eq!(entries[0].result.points, 10);
        assert_eq!(entries[1].game.id, "m2");
        assert_eq!(entries[1].result.points, 0);
    }

    #[test]
    fn test_match_bets_ranked_by_points() {
        let matches = vec![game("m1", "Group A", Some((2, 1))), game("m2", "Group A", None)];
        let bets = vec![
            bet("m1", "ana", 0, 3),
            bet("m1", "bob", 2, 1),
            bet("m2", "cid", 1, 0),
            bet("m1", "ghost", 2, 1),
        ];
        let users = vec![
            user("ana", UserRole::User, 0),
            user("bob", UserRole::User, 0),
            user("cid", UserRole::User, 0),
        ];

        let entries = match_bets(&users, &bets, &matches[0]);
        let names: Vec<&str> = entries.iter().map(|e| e.user.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "ana"]);
        assert_eq!(entries[0].result.points, 10);
        assert_eq!(entries[1].result.points, 0);

        let open = match_bets(&users, &bets, &matches[1]);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].result.points, 0);
    }
}
