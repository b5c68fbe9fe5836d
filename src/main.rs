use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bet_league::config::{self, Config};
use bet_league::league::{self, League, LeagueError, UserRole};
use bet_league::output;
use bet_league::scoring;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the leaderboard (default if no subcommand)
    Standings {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// List all matches with their status and result
    Matches,
    /// Show how a player earned their points, bet by bet
    Audit {
        username: String,
    },
    /// Schedule, edit, settle or delete matches
    #[command(subcommand)]
    Match(MatchCommand),
    /// Place or withdraw a bet
    #[command(subcommand)]
    Bet(BetCommand),
    /// Register, rename or remove players
    #[command(subcommand)]
    User(UserCommand),
    /// Rebuild every player's points from the recorded bets
    Recompute,
    /// Check the league data file for inconsistencies
    Check,
}

#[derive(Subcommand, Debug)]
enum MatchCommand {
    /// Schedule a new match
    Add {
        home: String,
        away: String,
        /// Group label ("Group A") or knockout stage ("Round of 16", "Quarter-Final", "Semi-Final", "Final")
        #[arg(long)]
        group: String,
        /// Kickoff time, RFC 3339 (e.g. 2026-06-12T16:00:00Z)
        #[arg(long)]
        date: DateTime<Utc>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Record the final score and update the standings
    Result {
        id: String,
        home: u32,
        away: u32,
        /// Team that went through on penalties (knockout draws only)
        #[arg(long)]
        penalty_winner: Option<String>,
    },
    /// Change teams, stage or kickoff of a match (status and result are kept)
    Edit {
        id: String,
        #[arg(long)]
        home: Option<String>,
        #[arg(long)]
        away: Option<String>,
        #[arg(long)]
        group: Option<String>,
        /// Kickoff time, RFC 3339
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Show every bet placed on a match and how it scored
    Bets {
        id: String,
    },
    /// Delete a match and every bet placed on it
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum BetCommand {
    /// Place a bet, replacing any earlier bet on the same match
    Place {
        username: String,
        match_id: String,
        home: u32,
        away: u32,
        /// Predicted penalty winner (required when betting a knockout draw)
        #[arg(long)]
        penalty_winner: Option<String>,
    },
    /// Withdraw a bet
    Delete {
        username: String,
        match_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a player
    Add {
        username: String,
        /// Display name (defaults to the username)
        #[arg(long)]
        name: Option<String>,
        /// Register as administrator (admins do not bet)
        #[arg(long)]
        admin: bool,
    },
    /// Change a player's display name
    Rename {
        username: String,
        name: String,
    },
    /// Remove a player and all of their bets
    Delete {
        username: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "bet-league")]
#[command(about = "Score prediction league: bets, results and standings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bet-league/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the league data file (overrides the config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    bet_league::logging::init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Standings { tsv: false });

    // Load config
    let config = match config::load_config(cli.config.map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let lock = match config::bet_lock(&config) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let data_path = config::data_path(&config, cli.data.map(PathBuf::from));
    tracing::debug!(path = %data_path.display(), "using league file");

    let mut league = match league::load_league(&data_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if let Err(problems) = league::validate_league(&league) {
        for problem in problems {
            tracing::warn!("league data: {}", problem);
        }
    }

    let changed = match run(command, &mut league, &config, lock) {
        Ok(changed) => changed,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_REJECTED);
        }
    };

    if changed {
        if let Err(e) = league::save_league(&data_path, &league) {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Execute one command against the loaded league.
/// Returns true when the league was modified and must be saved.
fn run(command: Commands, league: &mut League, config: &Config, lock: Duration) -> Result<bool> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Standings { tsv } => {
            let ranked = scoring::leaderboard(&league.users, config.show_admins());
            if tsv {
                println!("{}", output::format_leaderboard_tsv(&ranked));
            } else {
                println!("{}", output::format_leaderboard(&ranked, use_colors));
            }
            Ok(false)
        }
        Commands::Matches => {
            println!("{}", output::format_match_list(&league.matches, use_colors));
            Ok(false)
        }
        Commands::Audit { username } => {
            let user = league
                .find_user_by_username(&username)
                .ok_or_else(|| LeagueError::UserNotFound(username.clone()))?;
            let entries = scoring::audit_user(&league.matches, &league.bets, &user.id);
            println!("{}", output::format_audit(user, &entries, use_colors));
            Ok(false)
        }
        Commands::Match(cmd) => run_match(cmd, league, use_colors),
        Commands::Bet(cmd) => run_bet(cmd, league, lock),
        Commands::User(cmd) => run_user(cmd, league),
        Commands::Recompute => {
            league.recompute();
            println!("Standings recomputed for {} users.", league.users.len());
            Ok(true)
        }
        Commands::Check => match league::validate_league(league) {
            Ok(()) => {
                println!(
                    "OK: {} matches, {} bets, {} users.",
                    league.matches.len(),
                    league.bets.len(),
                    league.users.len()
                );
                Ok(false)
            }
            Err(errors) => {
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                anyhow::bail!("{} problem(s) found in league data", errors.len())
            }
        },
    }
}

fn run_match(cmd: MatchCommand, league: &mut League, use_colors: bool) -> Result<bool> {
    match cmd {
        MatchCommand::Add {
            home,
            away,
            group,
            date,
            description,
        } => {
            let id = league.add_match(&home, &away, &group, date, description)?;
            println!("Scheduled {} vs {} ({}) as {}", home.trim(), away.trim(), group.trim(), id);
        }
        MatchCommand::Result {
            id,
            home,
            away,
            penalty_winner,
        } => {
            league.record_result(&id, home, away, penalty_winner.as_deref())?;
            if let Some(game) = league.find_match(&id) {
                println!("Result recorded: {}", output::format_scoreline(game));
            }
        }
        MatchCommand::Edit {
            id,
            home,
            away,
            group,
            date,
        } => {
            league.update_match_details(
                &id,
                home.as_deref(),
                away.as_deref(),
                group.as_deref(),
                date,
            )?;
            if let Some(game) = league.find_match(&id) {
                println!("Updated {} ({}, {})", game.fixture(), game.group, output::format_kickoff(game.date));
            }
        }
        MatchCommand::Bets { id } => {
            let game = league
                .find_match(&id)
                .ok_or_else(|| LeagueError::MatchNotFound(id.clone()))?;
            let entries = scoring::match_bets(&league.users, &league.bets, game);
            println!("{}", output::format_match_bets(game, &entries, use_colors));
            return Ok(false);
        }
        MatchCommand::Delete { id } => {
            let removed = league.delete_match(&id)?;
            println!("Deleted {}", removed.fixture());
        }
    }
    Ok(true)
}

fn run_bet(cmd: BetCommand, league: &mut League, lock: Duration) -> Result<bool> {
    match cmd {
        BetCommand::Place {
            username,
            match_id,
            home,
            away,
            penalty_winner,
        } => {
            let user_id = resolve_user(league, &username)?;
            league.place_bet(
                &user_id,
                &match_id,
                home,
                away,
                penalty_winner.as_deref(),
                Utc::now(),
                lock,
            )?;
            if let Some(bet) = league.user_bet(&match_id, &user_id) {
                println!("Bet saved for @{}: {}", username, output::format_bet(bet));
            }
        }
        BetCommand::Delete { username, match_id } => {
            let user_id = resolve_user(league, &username)?;
            league.delete_bet(&match_id, &user_id)?;
            println!("Bet withdrawn for @{}", username);
        }
    }
    Ok(true)
}

fn run_user(cmd: UserCommand, league: &mut League) -> Result<bool> {
    match cmd {
        UserCommand::Add {
            username,
            name,
            admin,
        } => {
            let role = if admin { UserRole::Admin } else { UserRole::User };
            let display_name = name.unwrap_or_else(|| username.clone());
            league.register_user(&display_name, &username, role)?;
            println!("Registered @{}", username.trim());
        }
        UserCommand::Rename { username, name } => {
            let user_id = resolve_user(league, &username)?;
            league.rename_user(&user_id, &name)?;
            println!("Renamed @{} to {}", username, name.trim());
        }
        UserCommand::Delete { username } => {
            let user_id = resolve_user(league, &username)?;
            league.delete_user(&user_id)?;
            println!("Removed @{}", username);
        }
    }
    Ok(true)
}

fn resolve_user(league: &League, username: &str) -> Result<String, LeagueError> {
    league
        .find_user_by_username(username)
        .map(|u| u.id.clone())
        .ok_or_else(|| LeagueError::UserNotFound(username.to_string()))
}
