//! Live match scoring: point tracking and set/match win evaluation.

use crate::models::{SetScore, Side, TournamentConfig};
use serde::{Deserialize, Serialize};

/// Outcome of a set-end evaluation. `Ongoing` is a reported condition, not a
/// failure: the set simply has not been decided yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetEnd {
    Won(Side),
    Ongoing,
}

/// Outcome of a match-end evaluation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchEnd {
    Won(Side),
    Ongoing,
}

/// Tracks the live score of a single match: current points per side, sets won
/// per side, and the history of completed sets.
///
/// Win rules: a set is won at `winning_score` points with a margin of at
/// least 2; the match is won at `ceil(set_count / 2)` sets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreEngine {
    points: [u32; 2],
    sets_won: [u32; 2],
    history: Vec<SetScore>,
    winning_score: u32,
    sets_to_win: u32,
}

impl ScoreEngine {
    pub fn new(config: &TournamentConfig) -> Self {
        Self {
            points: [0, 0],
            sets_won: [0, 0],
            history: Vec::new(),
            winning_score: config.winning_score,
            sets_to_win: config.sets_to_win(),
        }
    }

    fn index(side: Side) -> usize {
        match side {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn points(&self, side: Side) -> u32 {
        self.points[Self::index(side)]
    }

    pub fn sets_won(&self, side: Side) -> u32 {
        self.sets_won[Self::index(side)]
    }

    pub fn history(&self) -> &[SetScore] {
        &self.history
    }

    /// Add one point to the given side.
    pub fn add_point(&mut self, side: Side) {
        self.points[Self::index(side)] += 1;
    }

    /// Remove one point from the given side, clamped at zero (a correction
    /// below zero is silently ignored, not an error).
    pub fn decrement_point(&mut self, side: Side) {
        let p = &mut self.points[Self::index(side)];
        *p = p.saturating_sub(1);
    }

    /// Check the set win rule against the current points. On a win the set is
    /// appended to history, the winner's set counter advances, and the points
    /// reset to (0, 0). Otherwise nothing changes.
    pub fn evaluate_set_end(&mut self) -> SetEnd {
        let winner = self.set_winner();
        if let SetEnd::Won(side) = winner {
            self.history.push(SetScore {
                set_number: self.history.len() as u32 + 1,
                score_a: self.points[0],
                score_b: self.points[1],
                winning_side: side,
            });
            self.sets_won[Self::index(side)] += 1;
            self.points = [0, 0];
        }
        winner
    }

    fn set_winner(&self) -> SetEnd {
        for side in [Side::A, Side::B] {
            let own = self.points[Self::index(side)];
            let other = self.points[Self::index(side.other())];
            if own >= self.winning_score && own >= other + 2 {
                return SetEnd::Won(side);
            }
        }
        SetEnd::Ongoing
    }

    /// Check whether either side has reached the sets-to-win threshold.
    pub fn evaluate_match_end(&self) -> MatchEnd {
        for side in [Side::A, Side::B] {
            if self.sets_won[Self::index(side)] >= self.sets_to_win {
                return MatchEnd::Won(side);
            }
        }
        MatchEnd::Ongoing
    }
}

