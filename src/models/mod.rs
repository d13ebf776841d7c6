//! Data structures for the tournament coordinator: teams, matches, schedules.

mod config;
mod game;
mod record;
mod team;
mod tournament;

pub use config::{
    MatchType, TournamentConfig, TournamentFormat, DEFAULT_SET_COUNT, DEFAULT_WINNING_SCORE,
    EXPEDITION_GROUP_SIZE,
};
pub use game::{Bracket, GameMatch, MatchId, MatchRecord, MatchStatus, SetScore, Side, Slot};
pub use record::{MatchResult, RecordedMatch, RoundRobinRecord, StandingEntry};
pub use team::{Team, TeamId};
pub use tournament::{
    Group, MatchPhase, Notification, Schedule, Tournament, TournamentError, TournamentId,
};
