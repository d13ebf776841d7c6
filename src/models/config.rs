//! Tournament configuration: format, match type, win-condition parameters.

use serde::{Deserialize, Deserializer, Serialize};

/// Tournament format. Unrecognized selector values fall back to single
/// elimination (setup degrades gracefully instead of failing).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
    RoundRobin,
    /// Grouped round robin feeding a knockout stage.
    Expedition,
}

impl TournamentFormat {
    /// Parse a selector value; anything unrecognized is single elimination.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "round_robin" | "round robin" => TournamentFormat::RoundRobin,
            "expedition" => TournamentFormat::Expedition,
            _ => TournamentFormat::SingleElimination,
        }
    }
}

impl<'de> Deserialize<'de> for TournamentFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(TournamentFormat::parse(&value))
    }
}

/// Kind of match being played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Singles,
    Doubles,
    Team,
}

/// Points needed to win a set (with a 2-point margin) in the default rules.
pub const DEFAULT_WINNING_SCORE: u32 = 11;

/// Default best-of set count.
pub const DEFAULT_SET_COUNT: u32 = 5;

/// Teams per group in the expedition format (last group may be smaller).
pub const EXPEDITION_GROUP_SIZE: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default)]
    pub match_type: MatchType,
    /// Total sets in a match (best-of); a side wins at ceil(set_count / 2).
    #[serde(default = "default_set_count")]
    pub set_count: u32,
    /// Points needed to win a set, margin 2 required.
    #[serde(default = "default_winning_score")]
    pub winning_score: u32,
}

fn default_set_count() -> u32 {
    DEFAULT_SET_COUNT
}

fn default_winning_score() -> u32 {
    DEFAULT_WINNING_SCORE
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            format: TournamentFormat::default(),
            match_type: MatchType::default(),
            set_count: DEFAULT_SET_COUNT,
            winning_score: DEFAULT_WINNING_SCORE,
        }
    }
}

impl TournamentConfig {
    /// Completed sets a side needs to win the match.
    pub fn sets_to_win(&self) -> u32 {
        self.set_count.div_ceil(2)
    }
}
