//! Match, bracket, and set-score data structures.

use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Occupant of one side of a match slot.
///
/// `Bye` marks a side with no opponent (automatic advancement); `Tbd` marks a
/// later-round placeholder waiting for a prior-round winner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Team(TeamId),
    Bye,
    Tbd,
}

impl Slot {
    pub fn team(&self) -> Option<TeamId> {
        match self {
            Slot::Team(id) => Some(*id),
            _ => None,
        }
    }
}

/// Derived match status; never stored, always computed from the match and the
/// currently selected match id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Bye,
    Completed,
    InProgress,
    Pending,
}

/// A single match: two slots and an optional winner.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_a: Slot,
    pub team_b: Slot,
    /// None until the match is decided.
    pub winner: Option<TeamId>,
}

impl GameMatch {
    pub fn new(team_a: Slot, team_b: Slot) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            winner: None,
        }
    }

    /// Later-round placeholder: both sides undetermined.
    pub fn placeholder() -> Self {
        Self::new(Slot::Tbd, Slot::Tbd)
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }

    /// Side a given team occupies, if it is in this match.
    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        if self.team_a.team() == Some(team) {
            Some(Side::A)
        } else if self.team_b.team() == Some(team) {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn is_bye(&self) -> bool {
        self.team_a == Slot::Bye || self.team_b == Slot::Bye
    }

    /// Both sides resolved to real teams and no winner yet.
    pub fn is_playable(&self) -> bool {
        self.winner.is_none() && self.team_a.team().is_some() && self.team_b.team().is_some()
    }

    /// Status derivation: bye beats completed beats in-progress beats pending.
    pub fn status(&self, selected: Option<MatchId>) -> MatchStatus {
        if self.is_bye() {
            MatchStatus::Bye
        } else if self.winner.is_some() {
            MatchStatus::Completed
        } else if selected == Some(self.id) {
            MatchStatus::InProgress
        } else {
            MatchStatus::Pending
        }
    }
}

/// An elimination bracket: ordered rounds, each an ordered list of matches.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Vec<GameMatch>>,
}

impl Bracket {
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// The bracket is complete when the final round's single match is decided.
    pub fn is_complete(&self) -> bool {
        match self.rounds.last() {
            Some(round) => round.len() == 1 && round[0].winner.is_some(),
            None => false,
        }
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.rounds
            .last()
            .and_then(|r| r.first())
            .and_then(|m| m.winner)
    }

    pub fn find(&self, id: MatchId) -> Option<&GameMatch> {
        self.rounds.iter().flatten().find(|m| m.id == id)
    }

    /// Position of a match as (round index, match index in round).
    pub fn position(&self, id: MatchId) -> Option<(usize, usize)> {
        self.rounds
            .iter()
            .enumerate()
            .find_map(|(r, round)| round.iter().position(|m| m.id == id).map(|i| (r, i)))
    }

    /// 1-based index of the first round with an undecided non-bye match;
    /// the last round once the bracket is complete.
    pub fn current_round(&self) -> usize {
        for (i, round) in self.rounds.iter().enumerate() {
            if round.iter().any(|m| m.winner.is_none() && !m.is_bye()) {
                return i + 1;
            }
        }
        self.rounds.len().max(1)
    }
}

/// Per-set final score, appended to a match's history as sets complete.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub set_number: u32,
    pub score_a: u32,
    pub score_b: u32,
    pub winning_side: Side,
}

/// Completed-match log entry for the tournament history view.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    /// None when the match was abandoned.
    pub winner: Option<TeamId>,
    pub sets: Vec<SetScore>,
    pub completed_at: DateTime<Utc>,
}
