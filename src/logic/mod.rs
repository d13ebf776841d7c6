//! Tournament logic: schedule generation, scoring, progression, standings.

pub mod bracket;
mod controller;
mod progression;
mod roster;
pub mod scoring;
mod standings;

pub use bracket::generate;
pub use controller::{
    add_point, current_standings, decrement_point, end_match, end_set, group_standings,
    load_roster, record_result, regenerate, select_match, set_config, shuffle_roster, start_match,
};
pub use progression::ProgressEvent;
pub use roster::parse_roster_csv;
pub use scoring::{MatchEnd, ScoreEngine, SetEnd};
pub use standings::standings;
