//! Table tennis tournament coordinator: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    add_point, current_standings, decrement_point, end_match, end_set, generate, group_standings,
    load_roster, parse_roster_csv, record_result, regenerate, select_match, set_config,
    shuffle_roster, standings, start_match, MatchEnd, ScoreEngine, SetEnd,
};
pub use models::{
    Bracket, GameMatch, Group, MatchId, MatchPhase, MatchRecord, MatchResult, MatchStatus,
    MatchType, Notification, RecordedMatch, RoundRobinRecord, Schedule, SetScore, Side, Slot,
    StandingEntry, Team, TeamId, Tournament, TournamentConfig, TournamentError, TournamentFormat,
    TournamentId,
};
