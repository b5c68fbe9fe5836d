pub mod engine;
pub mod standings;

pub use engine::{score_bet, Reason, ScoreResult};
pub use standings::{
    audit_user, leaderboard, match_bets, recompute_standings, AuditEntry, MatchBetEntry,
};
