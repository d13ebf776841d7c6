//! Round-robin records and the derived standings table.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Outcome of one round-robin match from a single team's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Won,
    Lost,
}

/// One entry in a team's round-robin match log.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecordedMatch {
    pub opponent: TeamId,
    pub result: MatchResult,
}

/// Per-team round-robin tally. Both sides of a match are updated together,
/// never one without the other.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinRecord {
    pub wins: u32,
    pub losses: u32,
    /// Tournament points: 2 per win, 1 per loss.
    pub points: u32,
    pub matches: Vec<RecordedMatch>,
}

impl RoundRobinRecord {
    pub fn record_win(&mut self, opponent: TeamId) {
        self.wins += 1;
        self.points += 2;
        self.matches.push(RecordedMatch {
            opponent,
            result: MatchResult::Won,
        });
    }

    pub fn record_loss(&mut self, opponent: TeamId) {
        self.losses += 1;
        self.points += 1;
        self.matches.push(RecordedMatch {
            opponent,
            result: MatchResult::Lost,
        });
    }
}

/// One row of the ranked standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team: TeamId,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
}
