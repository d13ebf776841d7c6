//! Standings: rank round-robin records into a table.

use crate::models::{RoundRobinRecord, StandingEntry, TeamId};
use std::collections::HashMap;

/// Rank records descending by points. Ties break on ascending team id so the
/// ordering is reproducible; no further sporting tie-break is applied.
pub fn standings(records: &HashMap<TeamId, RoundRobinRecord>) -> Vec<StandingEntry> {
    let mut table: Vec<StandingEntry> = records
        .iter()
        .map(|(team, rec)| StandingEntry {
            team: *team,
            wins: rec.wins,
            losses: rec.losses,
            points: rec.points,
        })
        .collect();
    table.sort_by(|a, b| b.points.cmp(&a.points).then(a.team.cmp(&b.team)));
    table
}
