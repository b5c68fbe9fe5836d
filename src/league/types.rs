use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stage labels that belong to the elimination rounds.
/// A draw in one of these stages is decided on penalties.
pub const KNOCKOUT_STAGES: [&str; 4] = ["Round of 16", "Quarter-Final", "Semi-Final", "Final"];

/// Check whether a stage label names a knockout round (exact, case-sensitive match)
pub fn is_knockout_stage(group: &str) -> bool {
    KNOCKOUT_STAGES.contains(&group)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub date: DateTime<Utc>,     // Kickoff
    pub group: String,           // Group label or knockout stage label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>, // Set by admin once finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_winner: Option<String>, // Team name, knockout draws only
    pub status: MatchStatus,
}

impl Match {
    pub fn is_knockout(&self) -> bool {
        is_knockout_stage(&self.group)
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Final scoreline, only when the match is finished and both scores are recorded
    pub fn final_score(&self) -> Option<(u32, u32)> {
        if !self.is_finished() {
            return None;
        }
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    /// Recorded shootout winner of a finished knockout draw.
    /// An empty name counts as not recorded.
    pub fn penalty_decider(&self) -> Option<&str> {
        match self.final_score() {
            Some((home, away)) if home == away && self.is_knockout() => self
                .penalty_winner
                .as_deref()
                .filter(|w| !w.is_empty()),
            _ => None,
        }
    }

    /// True if `team` is one of the two sides (exact string comparison)
    pub fn has_team(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// "Home vs Away"
    pub fn fixture(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub match_id: String,
    pub user_id: String,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_winner: Option<String>, // Predicted shootout winner
    pub timestamp: DateTime<Utc>,
}

impl Bet {
    pub fn predicts_draw(&self) -> bool {
        self.home_score == self.away_score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: UserRole,
    /// Cached total, always rebuilt from bets by the standings recompute
    #[serde(default)]
    pub points: u32,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match(group: &str) -> Match {
        Match {
            id: "m1".to_string(),
            home_team: "Brazil".to_string(),
            away_team: "Argentina".to_string(),
            date: Utc::now(),
            group: group.to_string(),
            description: None,
            home_score: None,
            away_score: None,
            penalty_winner: None,
            status: MatchStatus::Scheduled,
        }
    }

    #[test]
    fn test_knockout_stage_labels() {
        assert!(is_knockout_stage("Round of 16"));
        assert!(is_knockout_stage("Quarter-Final"));
        assert!(is_knockout_stage("Semi-Final"));
        assert!(is_knockout_stage("Final"));
        assert!(!is_knockout_stage("Group A"));
        assert!(!is_knockout_stage("final")); // Case-sensitive
    }

    #[test]
    fn test_final_score_requires_finished() {
        let mut m = sample_match("Group A");
        m.home_score = Some(2);
        m.away_score = Some(1);
        assert_eq!(m.final_score(), None);

        m.status = MatchStatus::Finished;
        assert_eq!(m.final_score(), Some((2, 1)));
    }

    #[test]
    fn test_final_score_missing_scores() {
        let mut m = sample_match("Group A");
        m.status = MatchStatus::Finished;
        m.home_score = Some(2);
        assert_eq!(m.final_score(), None);
    }

    #[test]
    fn test_penalty_decider() {
        let mut m = sample_match("Final");
        m.penalty_winner = Some("Brazil".to_string());
        assert_eq!(m.penalty_decider(), None); // Not finished yet

        m.status = MatchStatus::Finished;
        m.home_score = Some(1);
        m.away_score = Some(1);
        assert_eq!(m.penalty_decider(), Some("Brazil"));

        m.penalty_winner = Some(String::new());
        assert_eq!(m.penalty_decider(), None);

        m.penalty_winner = Some("Brazil".to_string());
        m.group = "Group A".to_string();
        assert_eq!(m.penalty_decider(), None);
    }

    #[test]
    fn test_has_team() {
        let m = sample_match("Final");
        assert!(m.has_team("Brazil"));
        assert!(m.has_team("Argentina"));
        assert!(!m.has_team("brazil"));
        assert_eq!(m.fixture(), "Brazil vs Argentina");
    }

    #[test]
    fn test_match_json_uses_camel_case() {
        let mut m = sample_match("Final");
        m.status = MatchStatus::Finished;
        m.home_score = Some(1);
        m.away_score = Some(1);
        m.penalty_winner = Some("Brazil".to_string());

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["homeTeam"], "Brazil");
        assert_eq!(json["penaltyWinner"], "Brazil");
        assert_eq!(json["status"], "FINISHED");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_user_without_points_defaults_to_zero() {
        let json = r#"{"id":"u1","name":"Ana","username":"ana","password":"x","role":"USER"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.points, 0);
        assert!(!user.is_admin());
    }
}
