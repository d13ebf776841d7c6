//! Tournament: the single owner of roster, schedule, live score, and history.

use crate::logic::scoring::ScoreEngine;
use crate::models::config::TournamentConfig;
use crate::models::game::{Bracket, GameMatch, MatchId, MatchRecord, MatchStatus};
use crate::models::record::RoundRobinRecord;
use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Errors that can occur during tournament operations.
///
/// Most variants are user-correctable conditions the caller simply displays.
/// The variants flagged by [`TournamentError::is_invariant`] indicate broken
/// internal consistency and must be surfaced as faults, not absorbed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// An operation needed a selected match and none is selected.
    NoMatchSelected,
    /// Scoring operation with no match in progress.
    NoMatchInProgress,
    /// A match is already being scored; finish or close it first.
    MatchAlreadyInProgress,
    /// End-set requested but no side satisfies the win rule yet.
    SetStillOngoing,
    /// The match exists but cannot be played (bye, placeholder, or done).
    MatchNotPlayable(MatchId),
    /// Result recorded for a match that is not in the current schedule.
    MatchNotInSchedule(MatchId),
    /// Result recorded for a completed match with a different winner.
    ConflictingResult(MatchId),
}

impl TournamentError {
    /// True for programming invariant violations (fatal), false for
    /// user-correctable conditions.
    pub fn is_invariant(&self) -> bool {
        matches!(
            self,
            TournamentError::MatchNotInSchedule(_) | TournamentError::ConflictingResult(_)
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NoMatchSelected => write!(f, "No match selected"),
            TournamentError::NoMatchInProgress => write!(f, "No match in progress"),
            TournamentError::MatchAlreadyInProgress => {
                write!(f, "A match is already in progress")
            }
            TournamentError::SetStillOngoing => write!(
                f,
                "A team must have at least the winning score and lead by 2 points to end the set"
            ),
            TournamentError::MatchNotPlayable(_) => {
                write!(f, "Match is not playable (bye, undecided opponent, or already completed)")
            }
            TournamentError::MatchNotInSchedule(id) => {
                write!(f, "Match {id} is not part of the current schedule")
            }
            TournamentError::ConflictingResult(id) => {
                write!(f, "Match {id} already has a different recorded winner")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Discrete completion events. The core produces them; the surrounding UI
/// decides how to surface them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    SetWon { team: String, set_number: u32 },
    MatchWon { team: String },
    MatchAbandoned,
    GroupDecided { group: usize, team: String },
    TournamentWon { team: String },
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::SetWon { team, set_number } => {
                write!(f, "{team} wins set {set_number}!")
            }
            Notification::MatchWon { team } => write!(f, "{team} wins the match!"),
            Notification::MatchAbandoned => write!(f, "Match closed without a winner"),
            Notification::GroupDecided { group, team } => {
                write!(f, "{team} wins group {group} and advances!")
            }
            Notification::TournamentWon { team } => write!(f, "{team} wins the tournament!"),
        }
    }
}

/// One group of the expedition format: an independent round robin whose
/// winner is promoted into the knockout bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub members: Vec<TeamId>,
    pub matches: Vec<GameMatch>,
    pub records: HashMap<TeamId, RoundRobinRecord>,
    /// Winner once promoted into the knockout stage.
    pub promoted: Option<TeamId>,
}

impl Group {
    /// All group matches have a recorded winner. A single-member group is
    /// trivially complete.
    pub fn is_complete(&self) -> bool {
        if self.members.len() == 1 {
            return true;
        }
        !self.matches.is_empty() && self.matches.iter().all(|m| m.winner.is_some())
    }
}

/// Generated match structure for the configured format. Replaced wholesale on
/// reconfiguration; never patched across a format change.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Fewer than two teams: nothing to play.
    Empty,
    SingleElimination {
        bracket: Bracket,
    },
    RoundRobin {
        matches: Vec<GameMatch>,
        records: HashMap<TeamId, RoundRobinRecord>,
    },
    Expedition {
        groups: Vec<Group>,
        knockout: Bracket,
    },
}

impl Schedule {
    pub fn find(&self, id: MatchId) -> Option<&GameMatch> {
        match self {
            Schedule::Empty => None,
            Schedule::SingleElimination { bracket } => bracket.find(id),
            Schedule::RoundRobin { matches, .. } => matches.iter().find(|m| m.id == id),
            Schedule::Expedition { groups, knockout } => groups
                .iter()
                .find_map(|g| g.matches.iter().find(|m| m.id == id))
                .or_else(|| knockout.find(id)),
        }
    }

    /// Whether every result needed to finish the tournament is recorded.
    pub fn is_complete(&self) -> bool {
        match self {
            Schedule::Empty => false,
            Schedule::SingleElimination { bracket } => bracket.is_complete(),
            Schedule::RoundRobin { matches, .. } => {
                !matches.is_empty() && matches.iter().all(|m| m.winner.is_some())
            }
            Schedule::Expedition { groups, knockout } => {
                if knockout.is_empty() {
                    groups.iter().all(|g| g.is_complete())
                } else {
                    knockout.is_complete()
                }
            }
        }
    }
}

/// Match-session lifecycle: a match is first selected, then scored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    Idle,
    Selected {
        match_id: MatchId,
    },
    InProgress {
        match_id: MatchId,
    },
}

impl MatchPhase {
    pub fn match_id(&self) -> Option<MatchId> {
        match self {
            MatchPhase::Idle => None,
            MatchPhase::Selected { match_id } | MatchPhase::InProgress { match_id } => {
                Some(*match_id)
            }
        }
    }
}

/// Full tournament state. The schedule, records, selection, and live score
/// form one consistent snapshot; reconfiguration replaces them together.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    /// Ordered roster; list order is the seeding order.
    pub roster: Vec<Team>,
    pub schedule: Schedule,
    pub phase: MatchPhase,
    /// Live score of the match in progress.
    pub live: Option<ScoreEngine>,
    /// Completed (or abandoned) matches, oldest first.
    pub history: Vec<MatchRecord>,
}

impl Tournament {
    /// Create a tournament with no teams and an empty schedule.
    pub fn new(config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            roster: Vec::new(),
            schedule: Schedule::Empty,
            phase: MatchPhase::Idle,
            live: None,
            history: Vec::new(),
        }
    }

    /// Display name for a team id; placeholder text for ids not in the roster.
    pub fn team_name(&self, id: TeamId) -> &str {
        self.roster
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or("Unknown")
    }

    pub fn find_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.schedule.find(id)
    }

    /// Derived status of a match, taking the current selection into account.
    pub fn match_status(&self, m: &GameMatch) -> MatchStatus {
        m.status(self.phase.match_id())
    }

    /// 1-based current round (always 1 for the flat round-robin schedule;
    /// group stage counts as round 1 in the expedition format).
    pub fn current_round(&self) -> usize {
        match &self.schedule {
            Schedule::Empty | Schedule::RoundRobin { .. } => 1,
            Schedule::SingleElimination { bracket } => bracket.current_round(),
            Schedule::Expedition { groups, knockout } => {
                if groups.iter().any(|g| !g.is_complete()) {
                    1
                } else {
                    1 + knockout.current_round()
                }
            }
        }
    }

    /// Matches currently offered for play.
    pub fn current_matchups(&self) -> Vec<&GameMatch> {
        match &self.schedule {
            Schedule::Empty => Vec::new(),
            Schedule::SingleElimination { bracket } => {
                let round = bracket.current_round();
                bracket
                    .rounds
                    .get(round - 1)
                    .map(|r| r.iter().filter(|m| m.is_playable()).collect())
                    .unwrap_or_default()
            }
            Schedule::RoundRobin { matches, .. } => {
                matches.iter().filter(|m| m.is_playable()).collect()
            }
            Schedule::Expedition { groups, knockout } => {
                let mut open: Vec<&GameMatch> = groups
                    .iter()
                    .flat_map(|g| g.matches.iter().filter(|m| m.is_playable()))
                    .collect();
                if open.is_empty() {
                    let round = knockout.current_round();
                    open = knockout
                        .rounds
                        .get(round - 1)
                        .map(|r| r.iter().filter(|m| m.is_playable()).collect())
                        .unwrap_or_default();
                }
                open
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.schedule.is_complete()
    }
}
