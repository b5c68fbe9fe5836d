pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

pub use storage::{get_league_path, load_league, save_league};
pub use store::{League, LeagueError, LEAGUE_VERSION};
pub use types::{is_knockout_stage, Bet, Match, MatchStatus, User, UserRole, KNOCKOUT_STAGES};
pub use validation::validate_league;
