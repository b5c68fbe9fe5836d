pub mod formatter;

pub use formatter::{
    format_audit, format_bet, format_kickoff, format_leaderboard, format_leaderboard_tsv,
    format_match_bets, format_match_list, format_points, format_reasons, format_scoreline,
    should_use_colors,
};
