//! Result propagation: the single mutation point for schedule state.
//!
//! Elimination winners promote into next-round match `i / 2` (even index to
//! slot A, odd to slot B); round-robin results update both teams' records as
//! a pair; expedition group winners feed the knockout stage.

use crate::logic::standings::standings;
use crate::models::{
    Bracket, GameMatch, Group, MatchId, RoundRobinRecord, Schedule, Side, Slot, TeamId,
    TournamentError,
};
use std::collections::HashMap;

/// Schedule-level consequences of a recorded result, beyond the match itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressEvent {
    /// An expedition group finished and its winner entered the knockout.
    GroupDecided { group_index: usize, winner: TeamId },
    /// The whole tournament is decided.
    Complete { champion: Option<TeamId> },
}

/// Record `winner` as the result of `match_id`.
///
/// Re-recording a completed match with the same winner is an accepted no-op.
/// A different winner, an unknown match id, or a winner that is not a
/// participant are invariant violations.
pub fn record_result(
    schedule: &mut Schedule,
    match_id: MatchId,
    winner: TeamId,
) -> Result<Vec<ProgressEvent>, TournamentError> {
    match schedule {
        Schedule::Empty => Err(TournamentError::MatchNotInSchedule(match_id)),
        Schedule::SingleElimination { bracket } => {
            if record_elimination(bracket, match_id, winner)? {
                return Ok(Vec::new());
            }
            let mut events = Vec::new();
            if bracket.is_complete() {
                events.push(ProgressEvent::Complete {
                    champion: bracket.champion(),
                });
            }
            Ok(events)
        }
        Schedule::RoundRobin { matches, records } => {
            if record_round_robin(matches, records, match_id, winner)? {
                return Ok(Vec::new());
            }
            let mut events = Vec::new();
            if matches.iter().all(|m| m.winner.is_some()) {
                events.push(ProgressEvent::Complete {
                    champion: standings(records).first().map(|e| e.team),
                });
            }
            Ok(events)
        }
        Schedule::Expedition { groups, knockout } => {
            record_expedition(groups, knockout, match_id, winner)
        }
    }
}

/// Auto-resolve round-1 bye matches: the present team advances without play.
/// Called once after generation.
pub fn resolve_byes(bracket: &mut Bracket) {
    if bracket.rounds.is_empty() {
        return;
    }
    for i in 0..bracket.rounds[0].len() {
        let m = &bracket.rounds[0][i];
        if m.winner.is_none() && m.is_bye() {
            if let Some(team) = m.team_a.team().or_else(|| m.team_b.team()) {
                apply_elimination_win(bracket, 0, i, team);
            }
        }
    }
}

/// Elimination path. Returns true when the call was an idempotent re-record.
fn record_elimination(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: TeamId,
) -> Result<bool, TournamentError> {
    let (round, index) = bracket
        .position(match_id)
        .ok_or(TournamentError::MatchNotInSchedule(match_id))?;
    let m = &bracket.rounds[round][index];
    if m.side_of(winner).is_none() {
        return Err(TournamentError::ConflictingResult(match_id));
    }
    if let Some(existing) = m.winner {
        if existing == winner {
            return Ok(true);
        }
        return Err(TournamentError::ConflictingResult(match_id));
    }
    // Both slots must be resolved teams before a result may land; a
    // half-filled later-round match is not yet playable.
    if !m.is_playable() {
        return Err(TournamentError::MatchNotPlayable(match_id));
    }
    apply_elimination_win(bracket, round, index, winner);
    Ok(false)
}

/// Set the winner and promote it forward, advancing automatically through
/// structural byes in later rounds.
fn apply_elimination_win(bracket: &mut Bracket, round: usize, index: usize, winner: TeamId) {
    let mut round = round;
    let mut index = index;
    loop {
        bracket.rounds[round][index].winner = Some(winner);
        if round + 1 >= bracket.rounds.len() {
            break;
        }
        let next_index = index / 2;
        let side = if index % 2 == 0 { Side::A } else { Side::B };
        let next = &mut bracket.rounds[round + 1][next_index];
        *next.slot_mut(side) = Slot::Team(winner);
        if *next.slot(side.other()) != Slot::Bye {
            break;
        }
        round += 1;
        index = next_index;
    }
}

/// Round-robin path: winner +1 win / +2 points, loser +1 loss / +1 point,
/// both match logs appended; updated as a pair or not at all.
/// Returns true when the call was an idempotent re-record.
fn record_round_robin(
    matches: &mut [GameMatch],
    records: &mut HashMap<TeamId, RoundRobinRecord>,
    match_id: MatchId,
    winner: TeamId,
) -> Result<bool, TournamentError> {
    let m = matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotInSchedule(match_id))?;
    let side = m
        .side_of(winner)
        .ok_or(TournamentError::ConflictingResult(match_id))?;
    if let Some(existing) = m.winner {
        if existing == winner {
            return Ok(true);
        }
        return Err(TournamentError::ConflictingResult(match_id));
    }
    let loser = match m.slot(side.other()).team() {
        Some(id) => id,
        None => return Err(TournamentError::MatchNotPlayable(match_id)),
    };
    m.winner = Some(winner);
    if let Some(rec) = records.get_mut(&winner) {
        rec.record_win(loser);
    }
    if let Some(rec) = records.get_mut(&loser) {
        rec.record_loss(winner);
    }
    Ok(false)
}

/// Winner of a group, once every group match is decided. A single-member
/// group is decided trivially.
pub fn group_winner(group: &Group) -> Option<TeamId> {
    if group.members.len() == 1 {
        return Some(group.members[0]);
    }
    if !group.is_complete() {
        return None;
    }
    standings(&group.records).first().map(|e| e.team)
}

/// Promote every decided-but-unpromoted group winner into the knockout.
/// Called after generation (single-member groups) and after group results.
pub fn promote_ready_groups(groups: &mut [Group], knockout: &mut Bracket) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    for index in 0..groups.len() {
        if groups[index].promoted.is_some() {
            continue;
        }
        let Some(winner) = group_winner(&groups[index]) else {
            continue;
        };
        groups[index].promoted = Some(winner);
        events.push(ProgressEvent::GroupDecided {
            group_index: index,
            winner,
        });
        if !knockout.is_empty() {
            let slot_index = index / 2;
            let side = if index % 2 == 0 { Side::A } else { Side::B };
            *knockout.rounds[0][slot_index].slot_mut(side) = Slot::Team(winner);
            // A knockout entrant may meet a structural bye straight away.
            let m = &knockout.rounds[0][slot_index];
            if m.winner.is_none() && m.is_bye() {
                apply_elimination_win(knockout, 0, slot_index, winner);
            }
        }
    }
    events
}

fn record_expedition(
    groups: &mut Vec<Group>,
    knockout: &mut Bracket,
    match_id: MatchId,
    winner: TeamId,
) -> Result<Vec<ProgressEvent>, TournamentError> {
    let in_group = groups
        .iter()
        .position(|g| g.matches.iter().any(|m| m.id == match_id));
    if let Some(index) = in_group {
        let group = &mut groups[index];
        if record_round_robin(&mut group.matches, &mut group.records, match_id, winner)? {
            return Ok(Vec::new());
        }
        let mut events = promote_ready_groups(groups, knockout);
        if knockout.is_empty() {
            // Single group: the group winner is the champion.
            if let Some(ProgressEvent::GroupDecided { winner, .. }) = events.last().copied() {
                events.push(ProgressEvent::Complete {
                    champion: Some(winner),
                });
            }
        } else if knockout.is_complete() {
            // Promotion can finish the knockout through byes.
            events.push(ProgressEvent::Complete {
                champion: knockout.champion(),
            });
        }
        return Ok(events);
    }

    if record_elimination(knockout, match_id, winner)? {
        return Ok(Vec::new());
    }
    let mut events = Vec::new();
    if knockout.is_complete() {
        events.push(ProgressEvent::Complete {
            champion: knockout.champion(),
        });
    }
    Ok(events)
}
