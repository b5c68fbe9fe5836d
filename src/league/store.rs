use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Bet, Match, MatchStatus, User, UserRole};
use crate::scoring::standings::{count_dangling_bets, recompute_standings};

pub const LEAGUE_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeagueError {
    #[error("match not found: {0}")]
    MatchNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("no bet from user {user_id} on match {match_id}")]
    BetNotFound { match_id: String, user_id: String },

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("team name must not be empty")]
    EmptyTeamName,

    #[error("a match needs two different teams, got '{0}' twice")]
    SameTeams(String),

    #[error("'{team}' is not playing in {fixture}")]
    NotATeam { team: String, fixture: String },

    #[error("{0} is a knockout draw, a penalty winner is required")]
    PenaltyWinnerRequired(String),

    #[error("{0} is already finished")]
    MatchFinished(String),

    #[error("betting on {fixture} closed at {closed_at}")]
    BettingClosed {
        fixture: String,
        closed_at: DateTime<Utc>,
    },

    #[error("admin {0} cannot place bets")]
    AdminCannotBet(String),

    #[error("{0} is finished and cannot go back to scheduled")]
    ResultReverted(String),

    #[error("{0} is finished but its score is incomplete")]
    MissingScore(String),

    #[error("{0} is not finished and cannot carry a score")]
    UnexpectedScore(String),

    #[error("{0} was not a knockout draw, it cannot have a penalty winner")]
    PenaltyWinnerNotAllowed(String),
}

/// In-memory league snapshot: every match, bet and user.
///
/// Mutations that change which bets count (results, deletions) rebuild all
/// point totals before returning. Callers that share a snapshot between
/// writers must serialize load, mutate and save themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub bets: Vec<Bet>,
    #[serde(default)]
    pub users: Vec<User>,
}

fn default_version() -> u32 {
    LEAGUE_VERSION
}

impl Default for League {
    fn default() -> Self {
        Self::new()
    }
}

impl League {
    /// Create an empty league with the current version
    pub fn new() -> Self {
        Self {
            version: LEAGUE_VERSION,
            matches: Vec::new(),
            bets: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Empty league with a single administrator, used on first run
    pub fn with_default_admin() -> Self {
        let mut league = Self::new();
        league.users.push(User {
            id: "admin_001".to_string(),
            name: "Administrator".to_string(),
            username: "admin".to_string(),
            role: UserRole::Admin,
            points: 0,
        });
        league
    }

    // --- Lookups ---

    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn user_bet(&self, match_id: &str, user_id: &str) -> Option<&Bet> {
        self.bets
            .iter()
            .find(|b| b.match_id == match_id && b.user_id == user_id)
    }

    pub fn bets_for_match<'a>(&'a self, match_id: &'a str) -> impl Iterator<Item = &'a Bet> + 'a {
        self.bets.iter().filter(move |b| b.match_id == match_id)
    }

    pub fn bets_for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Bet> + 'a {
        self.bets.iter().filter(move |b| b.user_id == user_id)
    }

    // --- Standings ---

    /// Replace every user's points with a full recompute over the current bets
    pub fn recompute(&mut self) {
        let dangling = count_dangling_bets(&self.matches, &self.bets);
        if dangling > 0 {
            tracing::warn!(dangling, "skipping bets that reference missing matches");
        }

        self.users = recompute_standings(&self.matches, &self.bets, &self.users);

        for user in &self.users {
            tracing::debug!(username = %user.username, points = user.points, "recomputed total");
        }
    }

    // --- Matches ---

    /// Insert or replace a match by id.
    ///
    /// The match must be consistent on its own (teams, scores, penalty
    /// winner) and a finished match cannot be replaced by a scheduled one.
    /// Standings are rebuilt whenever the old or the new version is finished.
    pub fn save_match(&mut self, game: Match) -> Result<(), LeagueError> {
        check_teams(&game.home_team, &game.away_team)?;
        check_result(&game)?;

        let was_finished = self.find_match(&game.id).is_some_and(|m| m.is_finished());
        if was_finished && !game.is_finished() {
            return Err(LeagueError::ResultReverted(game.fixture()));
        }

        let finished = game.is_finished();
        match self.matches.iter_mut().find(|m| m.id == game.id) {
            Some(existing) => *existing = game,
            None => self.matches.push(game),
        }

        if finished || was_finished {
            self.recompute();
        }
        Ok(())
    }

    /// Change teams, stage or kickoff of an existing match, keeping its status and result
    pub fn update_match_details(
        &mut self,
        match_id: &str,
        home_team: Option<&str>,
        away_team: Option<&str>,
        group: Option<&str>,
        date: Option<DateTime<Utc>>,
    ) -> Result<(), LeagueError> {
        let mut game = self
            .find_match(match_id)
            .cloned()
            .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))?;

        if let Some(home) = home_team {
            game.home_team = home.trim().to_string();
        }
        if let Some(away) = away_team {
            game.away_team = away.trim().to_string();
        }
        if let Some(group) = group {
            game.group = group.trim().to_string();
        }
        if let Some(date) = date {
            game.date = date;
        }

        let fixture = game.fixture();
        self.save_match(game)?;
        tracing::info!(match_id, %fixture, "match updated");
        Ok(())
    }

    /// Schedule a new match and return its generated id
    pub fn add_match(
        &mut self,
        home_team: &str,
        away_team: &str,
        group: &str,
        date: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<String, LeagueError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.save_match(Match {
            id: id.clone(),
            home_team: home_team.trim().to_string(),
            away_team: away_team.trim().to_string(),
            date,
            group: group.trim().to_string(),
            description,
            home_score: None,
            away_score: None,
            penalty_winner: None,
            status: MatchStatus::Scheduled,
        })?;

        tracing::info!(match_id = %id, home_team, away_team, group, "match scheduled");
        Ok(id)
    }

    /// Record the final result of a match and rebuild the standings.
    ///
    /// The penalty winner is only kept for knockout draws, where it is
    /// mandatory and must be one of the two teams. Recording a result for a
    /// match that is already finished overwrites the previous result.
    pub fn record_result(
        &mut self,
        match_id: &str,
        home_score: u32,
        away_score: u32,
        penalty_winner: Option<&str>,
    ) -> Result<(), LeagueError> {
        let game = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))?;

        let penalty_winner = if game.is_knockout() && home_score == away_score {
            let team = penalty_winner
                .ok_or_else(|| LeagueError::PenaltyWinnerRequired(game.fixture()))?;
            check_member(game, team)?;
            Some(team.to_string())
        } else {
            if penalty_winner.is_some() {
                tracing::debug!(match_id, "dropping penalty winner, match was not a knockout draw");
            }
            None
        };

        game.home_score = Some(home_score);
        game.away_score = Some(away_score);
        game.penalty_winner = penalty_winner;
        game.status = MatchStatus::Finished;

        tracing::info!(
            match_id,
            home_score,
            away_score,
            penalty_winner = game.penalty_winner.as_deref().unwrap_or("-"),
            "result recorded"
        );

        self.recompute();
        Ok(())
    }

    /// Remove a match together with every bet placed on it
    pub fn delete_match(&mut self, match_id: &str) -> Result<Match, LeagueError> {
        let index = self
            .matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))?;
        let removed = self.matches.remove(index);

        let before = self.bets.len();
        self.bets.retain(|b| b.match_id != match_id);
        tracing::info!(match_id, bets_removed = before - self.bets.len(), "match deleted");

        self.recompute();
        Ok(removed)
    }

    // --- Bets ---

    /// Submit a bet, replacing any earlier bet by the same user on the same match.
    ///
    /// Betting closes `lock` before kickoff. A predicted shootout winner is
    /// required for a predicted draw in a knockout match and dropped otherwise.
    #[allow(clippy::too_many_arguments)]
    pub fn place_bet(
        &mut self,
        user_id: &str,
        match_id: &str,
        home_score: u32,
        away_score: u32,
        penalty_winner: Option<&str>,
        now: DateTime<Utc>,
        lock: Duration,
    ) -> Result<(), LeagueError> {
        let user = self
            .find_user(user_id)
            .ok_or_else(|| LeagueError::UserNotFound(user_id.to_string()))?;
        if user.is_admin() {
            return Err(LeagueError::AdminCannotBet(user.username.clone()));
        }

        let game = self
            .find_match(match_id)
            .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))?;
        if game.is_finished() {
            return Err(LeagueError::MatchFinished(game.fixture()));
        }

        let closed_at = game.date - lock;
        if now > closed_at {
            return Err(LeagueError::BettingClosed {
                fixture: game.fixture(),
                closed_at,
            });
        }

        let penalty_winner = if game.is_knockout() && home_score == away_score {
            let team = penalty_winner
                .ok_or_else(|| LeagueError::PenaltyWinnerRequired(game.fixture()))?;
            check_member(game, team)?;
            Some(team.to_string())
        } else {
            None
        };

        self.bets
            .retain(|b| !(b.match_id == match_id && b.user_id == user_id));
        self.bets.push(Bet {
            match_id: match_id.to_string(),
            user_id: user_id.to_string(),
            home_score,
            away_score,
            penalty_winner,
            timestamp: now,
        });

        tracing::info!(match_id, user_id, home_score, away_score, "bet placed");
        Ok(())
    }

    /// Withdraw a bet and rebuild the standings
    pub fn delete_bet(&mut self, match_id: &str, user_id: &str) -> Result<Bet, LeagueError> {
        let index = self
            .bets
            .iter()
            .position(|b| b.match_id == match_id && b.user_id == user_id)
            .ok_or_else(|| LeagueError::BetNotFound {
                match_id: match_id.to_string(),
                user_id: user_id.to_string(),
            })?;
        let removed = self.bets.remove(index);
        tracing::info!(match_id, user_id, "bet deleted");

        self.recompute();
        Ok(removed)
    }

    // --- Users ---

    /// Add a user and return the generated id. Usernames are unique.
    pub fn register_user(
        &mut self,
        name: &str,
        username: &str,
        role: UserRole,
    ) -> Result<String, LeagueError> {
        let username = username.trim();
        if self.find_user_by_username(username).is_some() {
            return Err(LeagueError::UsernameTaken(username.to_string()));
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        self.users.push(User {
            id: id.clone(),
            name: name.trim().to_string(),
            username: username.to_string(),
            role,
            points: 0,
        });

        tracing::info!(user_id = %id, username, ?role, "user registered");
        Ok(id)
    }

    /// Change a user's display name
    pub fn rename_user(&mut self, user_id: &str, name: &str) -> Result<(), LeagueError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| LeagueError::UserNotFound(user_id.to_string()))?;
        user.name = name.trim().to_string();
        tracing::info!(user_id, username = %user.username, name = %user.name, "user renamed");
        Ok(())
    }

    /// Remove a user together with all of their bets
    pub fn delete_user(&mut self, user_id: &str) -> Result<User, LeagueError> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| LeagueError::UserNotFound(user_id.to_string()))?;
        let removed = self.users.remove(index);

        let before = self.bets.len();
        self.bets.retain(|b| b.user_id != user_id);
        tracing::info!(
            user_id,
            username = %removed.username,
            bets_removed = before - self.bets.len(),
            "user deleted"
        );

        self.recompute();
        Ok(removed)
    }
}

fn check_teams(home: &str, away: &str) -> Result<(), LeagueError> {
    if home.trim().is_empty() || away.trim().is_empty() {
        return Err(LeagueError::EmptyTeamName);
    }
    if home == away {
        return Err(LeagueError::SameTeams(home.to_string()));
    }
    Ok(())
}

fn check_result(game: &Match) -> Result<(), LeagueError> {
    let has_score = game.home_score.is_some() || game.away_score.is_some();
    if !game.is_finished() {
        if has_score {
            return Err(LeagueError::UnexpectedScore(game.fixture()));
        }
        if game.penalty_winner.is_some() {
            return Err(LeagueError::PenaltyWinnerNotAllowed(game.fixture()));
        }
        return Ok(());
    }

    let (home, away) = game
        .final_score()
        .ok_or_else(|| LeagueError::MissingScore(game.fixture()))?;

    let knockout_draw = game.is_knockout() && home == away;
    match game.penalty_winner.as_deref() {
        Some(team) if knockout_draw => check_member(game, team),
        Some(_) => Err(LeagueError::PenaltyWinnerNotAllowed(game.fixture())),
        None if knockout_draw => Err(LeagueError::PenaltyWinnerRequired(game.fixture())),
        None => Ok(()),
    }
}

fn check_member(game: &Match, team: &str) -> Result<(), LeagueError> {
    if game.has_team(team) {
        Ok(())
    } else {
        Err(LeagueError::NotATeam {
            team: team.to_string(),
            fixture: game.fixture(),
        })
    }
}
