use std::fmt;

use crate::league::types::{Bet, Match};

/// A scoring rule that contributed points to a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    ExactScore,
    ExactScoreCorrectAdvancer,
    ExactScoreWrongAdvancer,
    CorrectDraw,
    CorrectWinner,
    HomeGoals,
    AwayGoals,
    TotalGoals,
    CorrectAdvancer,
}

impl Reason {
    pub fn points(self) -> u32 {
        match self {
            Reason::ExactScore => 10,
            Reason::ExactScoreCorrectAdvancer => 10,
            Reason::ExactScoreWrongAdvancer => 7,
            Reason::CorrectDraw => 2,
            Reason::CorrectWinner => 3,
            Reason::HomeGoals => 5,
            Reason::AwayGoals => 5,
            Reason::TotalGoals => 1,
            Reason::CorrectAdvancer => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Reason::ExactScore => "Exact score",
            Reason::ExactScoreCorrectAdvancer => "Exact score + correct advancer",
            Reason::ExactScoreWrongAdvancer => "Exact score (wrong advancer)",
            Reason::CorrectDraw => "Correct draw",
            Reason::CorrectWinner => "Correct winner",
            Reason::HomeGoals => "Home team goals",
            Reason::AwayGoals => "Away team goals",
            Reason::TotalGoals => "Total goals",
            Reason::CorrectAdvancer => "Correct advancer",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreResult {
    pub points: u32,
    pub reasons: Vec<Reason>, // In evaluation order
}

impl ScoreResult {
    fn single(reason: Reason) -> Self {
        Self {
            points: reason.points(),
            reasons: vec![reason],
        }
    }

    fn award(&mut self, reason: Reason) {
        self.points += reason.points();
        self.reasons.push(reason);
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.reasons.iter().map(|r| r.label()).collect()
    }
}

/// Score one bet against one match.
///
/// Unfinished matches (or finished ones without a recorded scoreline) score
/// nothing. An exact scoreline short-circuits every other rule; otherwise the
/// outcome, per-side goals, total goals and advancer rules stack.
pub fn score_bet(bet: &Bet, m: &Match) -> ScoreResult {
    let Some((home, away)) = m.final_score() else {
        return ScoreResult::default();
    };

    let advancer = m.penalty_decider();
    let picked_advancer = advancer.is_some_and(|w| bet.penalty_winner.as_deref() == Some(w));

    if bet.home_score == home && bet.away_score == away {
        return match advancer {
            Some(_) if picked_advancer => ScoreResult::single(Reason::ExactScoreCorrectAdvancer),
            Some(_) => ScoreResult::single(Reason::ExactScoreWrongAdvancer),
            None => ScoreResult::single(Reason::ExactScore),
        };
    }

    let mut result = ScoreResult::default();

    if home.cmp(&away) == bet.home_score.cmp(&bet.away_score) {
        if home == away {
            result.award(Reason::CorrectDraw);
        } else {
            result.award(Reason::CorrectWinner);
        }
    }

    if bet.home_score == home {
        result.award(Reason::HomeGoals);
    }

    if bet.away_score == away {
        result.award(Reason::AwayGoals);
    }

    // u64 so absurd goal counts cannot overflow
    if u64::from(bet.home_score) + u64::from(bet.away_score) == u64::from(home) + u64::from(away) {
        result.award(Reason::TotalGoals);
    }

    if picked_advancer {
        result.award(Reason::CorrectAdvancer);
    }

    result
}
