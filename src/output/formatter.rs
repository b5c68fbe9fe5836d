use std::io::IsTerminal;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::league::types::{Bet, Match, User};
use crate::scoring::{AuditEntry, MatchBetEntry, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// "1 pt" / "12 pts"
pub fn format_points(points: u32) -> String {
    if points == 1 {
        "1 pt".to_string()
    } else {
        format!("{} pts", points)
    }
}

/// Kickoff as "2026-06-12 16:00 UTC"
pub fn format_kickoff(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Reasons with their point values, e.g. "Correct winner (+3), Away team goals (+5)"
pub fn format_reasons(result: &ScoreResult) -> String {
    if result.reasons.is_empty() {
        return "-".to_string();
    }
    result
        .reasons
        .iter()
        .map(|r| format!("{} (+{})", r, r.points()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format the ranking as a table: Rank, Points, Name, @username
/// Rank column: 3 chars (fits "99."), right-aligned
/// Points column: right-aligned, 7 chars wide (fits "999 pts")
pub fn format_leaderboard(users: &[&User], use_colors: bool) -> String {
    if users.is_empty() {
        return "No players registered.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 3;
    let points_width = 7;
    let separator = "  ";

    users
        .iter()
        .enumerate()
        .map(|(idx, user)| {
            let rank_str = format!("{:>2}.", idx + 1);
            let points_str = format!("{:>width$}", format_points(user.points), width = points_width);
            let handle = format!("@{}", user.username);

            let fixed_width = rank_width + 1 + points_width + separator.len() * 2 + handle.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&user.name, width - fixed_width),
                Some(_) => truncate_name(&user.name, 20),
                None => user.name.clone(),
            };

            if use_colors {
                let rank = match idx {
                    0 => rank_str.yellow().bold().to_string(),
                    1 | 2 => rank_str.bold().to_string(),
                    _ => rank_str.dimmed().to_string(),
                };
                format!(
                    "{} {}{}{}{}{}",
                    rank,
                    points_str.green().bold(),
                    separator,
                    name.bold(),
                    separator,
                    handle.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, points_str, separator, name, separator, handle
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, points, username, name (no headers, no colors)
pub fn format_leaderboard_tsv(users: &[&User]) -> String {
    users
        .iter()
        .enumerate()
        .map(|(idx, user)| format!("{}\t{}\t{}\t{}", idx + 1, user.points, user.username, user.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// "Brazil 1-1 Argentina (pen. Brazil)" for finished matches, "Brazil vs Argentina" otherwise
pub fn format_scoreline(game: &Match) -> String {
    match game.final_score() {
        Some((home, away)) => {
            let mut line = format!("{} {}-{} {}", game.home_team, home, away, game.away_team);
            if let Some(winner) = game.penalty_decider() {
                line.push_str(&format!(" (pen. {})", winner));
            }
            line
        }
        None => game.fixture(),
    }
}

/// One match per line: id, stage, kickoff, scoreline, status
pub fn format_match_list(matches: &[Match], use_colors: bool) -> String {
    if matches.is_empty() {
        return "No matches scheduled.".to_string();
    }

    let mut sorted: Vec<&Match> = matches.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    sorted
        .iter()
        .map(|game| {
            let status = if game.is_finished() { "FT" } else { "--" };
            if use_colors {
                let status = if game.is_finished() {
                    status.green().to_string()
                } else {
                    status.dimmed().to_string()
                };
                format!(
                    "{}  {}  {}  {}  {}",
                    game.id.dimmed(),
                    status,
                    format_kickoff(game.date),
                    game.group.cyan(),
                    format_scoreline(game).bold()
                )
            } else {
                format!(
                    "{}  {}  {}  {}  {}",
                    game.id,
                    status,
                    format_kickoff(game.date),
                    game.group,
                    format_scoreline(game)
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// "1-1 (Brazil)" for a bet, showing the predicted advancer when present
pub fn format_bet(bet: &Bet) -> String {
    match bet.penalty_winner {
        Some(ref winner) => format!("{}-{} ({})", bet.home_score, bet.away_score, winner),
        None => format!("{}-{}", bet.home_score, bet.away_score),
    }
}

/// Per-bet breakdown of how a user earned their points
pub fn format_audit(user: &User, entries: &[AuditEntry], use_colors: bool) -> String {
    let header = format!("{} (@{}) - {}", user.name, user.username, format_points(user.points));
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    if entries.is_empty() {
        lines.push("  No bets placed.".to_string());
        return lines.join("\n");
    }

    for entry in entries {
        let outcome = if entry.game.is_finished() {
            format!("{}  {}", format_points(entry.result.points), format_reasons(&entry.result))
        } else {
            "pending".to_string()
        };
        if use_colors {
            lines.push(format!(
                "  {}\n    Bet: {}  ->  {}",
                format_scoreline(entry.game).bold(),
                format_bet(entry.bet).cyan(),
                outcome.green()
            ));
        } else {
            lines.push(format!(
                "  {}\n    Bet: {}  ->  {}",
                format_scoreline(entry.game),
                format_bet(entry.bet),
                outcome
            ));
        }
    }

    lines.join("\n")
}

/// Every bet placed on one match, for the admin view
pub fn format_match_bets(game: &Match, entries: &[MatchBetEntry], use_colors: bool) -> String {
    let header = format!("{}  {}  {}", game.group, format_kickoff(game.date), format_scoreline(game));
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    if entries.is_empty() {
        lines.push("  No bets on this match.".to_string());
        return lines.join("\n");
    }

    let name_width = entries
        .iter()
        .map(|e| e.user.username.chars().count() + 1)
        .max()
        .unwrap_or(0);

    for entry in entries {
        let handle = format!("{:<width$}", format!("@{}", entry.user.username), width = name_width);
        let bet = format!("{:<8}", format_bet(entry.bet));
        let outcome = if game.is_finished() {
            format!("{:>7}  {}", format_points(entry.result.points), format_reasons(&entry.result))
        } else {
            "pending".to_string()
        };
        if use_colors {
            lines.push(format!("  {}  {}  {}", handle.dimmed(), bet.cyan(), outcome.green()));
        } else {
            lines.push(format!("  {}  {}  {}", handle, bet, outcome));
        }
    }

    lines.join("\n")
}
