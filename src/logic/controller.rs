//! Tournament controller operations: the event entry points that tie the
//! score engine, schedule progression, and standings together.
//!
//! Every operation runs to completion synchronously; the schedule, records,
//! selection, and live score are one snapshot and are replaced together on
//! reconfiguration.

use crate::logic::bracket;
use crate::logic::progression::{self, ProgressEvent};
use crate::logic::scoring::{MatchEnd, ScoreEngine, SetEnd};
use crate::logic::standings::standings;
use crate::models::{
    MatchId, MatchPhase, MatchRecord, Notification, Schedule, SetScore, Side, StandingEntry, Team,
    TeamId, Tournament, TournamentConfig, TournamentError,
};
use chrono::Utc;

/// Load a new roster and regenerate the schedule from scratch.
pub fn load_roster(tournament: &mut Tournament, teams: Vec<Team>) {
    tournament.roster = teams;
    regenerate(tournament);
}

/// Apply a new configuration; discards the bracket, records, and any
/// in-progress scoring.
pub fn set_config(tournament: &mut Tournament, config: TournamentConfig) {
    tournament.config = config;
    regenerate(tournament);
}

/// Shuffle the roster (randomized seeding) and regenerate.
pub fn shuffle_roster(tournament: &mut Tournament) {
    use rand::seq::SliceRandom;
    tournament.roster.shuffle(&mut rand::thread_rng());
    regenerate(tournament);
}

/// Rebuild the schedule for the current roster and config. Selection, live
/// score, and history are cleared with it; nothing survives a regeneration.
pub fn regenerate(tournament: &mut Tournament) {
    let mut schedule = bracket::generate(&tournament.roster, tournament.config.format);
    match &mut schedule {
        Schedule::SingleElimination { bracket } => progression::resolve_byes(bracket),
        Schedule::Expedition { groups, knockout } => {
            // Single-member groups are decided at generation time.
            progression::promote_ready_groups(groups, knockout);
        }
        _ => {}
    }
    tournament.schedule = schedule;
    tournament.phase = MatchPhase::Idle;
    tournament.live = None;
    tournament.history.clear();
}

/// Select a match for play. Valid while no match is being scored.
pub fn select_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    if matches!(tournament.phase, MatchPhase::InProgress { .. }) {
        return Err(TournamentError::MatchAlreadyInProgress);
    }
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotInSchedule(match_id))?;
    if !m.is_playable() {
        return Err(TournamentError::MatchNotPlayable(match_id));
    }
    tournament.phase = MatchPhase::Selected { match_id };
    Ok(())
}

/// Open the scoring session for the selected match: points reset to (0, 0).
pub fn start_match(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let match_id = match tournament.phase {
        MatchPhase::Idle => return Err(TournamentError::NoMatchSelected),
        MatchPhase::InProgress { .. } => return Err(TournamentError::MatchAlreadyInProgress),
        MatchPhase::Selected { match_id } => match_id,
    };
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotInSchedule(match_id))?;
    if !m.is_playable() {
        return Err(TournamentError::MatchNotPlayable(match_id));
    }
    tournament.live = Some(ScoreEngine::new(&tournament.config));
    tournament.phase = MatchPhase::InProgress { match_id };
    Ok(())
}

/// Add one point for a side of the match in progress.
pub fn add_point(tournament: &mut Tournament, side: Side) -> Result<(), TournamentError> {
    live_mut(tournament)?.add_point(side);
    Ok(())
}

/// Remove one point (correction); clamped at zero.
pub fn decrement_point(tournament: &mut Tournament, side: Side) -> Result<(), TournamentError> {
    live_mut(tournament)?.decrement_point(side);
    Ok(())
}

fn live_mut(tournament: &mut Tournament) -> Result<&mut ScoreEngine, TournamentError> {
    tournament
        .live
        .as_mut()
        .ok_or(TournamentError::NoMatchInProgress)
}

/// End the current set. Fails with `SetStillOngoing` unless a side satisfies
/// the win rule; on success the set is banked and, if the side reached the
/// set threshold, the match completes and the result propagates.
pub fn end_set(tournament: &mut Tournament) -> Result<Vec<Notification>, TournamentError> {
    let match_id = match tournament.phase {
        MatchPhase::InProgress { match_id } => match_id,
        _ => return Err(TournamentError::NoMatchInProgress),
    };
    let engine = live_mut(tournament)?;
    let set_winner = match engine.evaluate_set_end() {
        SetEnd::Ongoing => return Err(TournamentError::SetStillOngoing),
        SetEnd::Won(side) => side,
    };
    let set_number = engine.history().len() as u32;
    let match_end = engine.evaluate_match_end();

    let mut notifications = vec![Notification::SetWon {
        team: side_name(tournament, match_id, set_winner)?,
        set_number,
    }];
    if let MatchEnd::Won(side) = match_end {
        notifications.extend(complete_match(tournament, match_id, side)?);
    }
    Ok(notifications)
}

/// End the match explicitly. If a side has already reached the set threshold
/// this completes it normally; otherwise the match is abandoned: logged with
/// no winner, nothing recorded into the schedule.
pub fn end_match(tournament: &mut Tournament) -> Result<Vec<Notification>, TournamentError> {
    let match_id = match tournament.phase {
        MatchPhase::InProgress { match_id } => match_id,
        _ => return Err(TournamentError::NoMatchInProgress),
    };
    let engine = live_mut(tournament)?;
    match engine.evaluate_match_end() {
        MatchEnd::Won(side) => complete_match(tournament, match_id, side),
        MatchEnd::Ongoing => {
            let sets = engine.history().to_vec();
            push_history(tournament, match_id, None, sets)?;
            tournament.phase = MatchPhase::Idle;
            tournament.live = None;
            Ok(vec![Notification::MatchAbandoned])
        }
    }
}

/// Record a finished match directly (paper score entry, no live scoring).
/// Re-recording an identical result is a no-op.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: TeamId,
) -> Result<Vec<Notification>, TournamentError> {
    if let Some(m) = tournament.find_match(match_id) {
        if m.winner == Some(winner) {
            return Ok(Vec::new());
        }
    }
    if tournament.phase.match_id() == Some(match_id) {
        // The result supersedes any scoring session on the same match.
        tournament.phase = MatchPhase::Idle;
        tournament.live = None;
    }
    let events = progression::record_result(&mut tournament.schedule, match_id, winner)?;
    push_history(tournament, match_id, Some(winner), Vec::new())?;
    let mut notifications = vec![Notification::MatchWon {
        team: tournament.team_name(winner).to_string(),
    }];
    notifications.extend(event_notifications(tournament, &events));
    Ok(notifications)
}

/// Current round-robin standings (empty for other formats).
pub fn current_standings(tournament: &Tournament) -> Vec<StandingEntry> {
    match &tournament.schedule {
        Schedule::RoundRobin { records, .. } => standings(records),
        _ => Vec::new(),
    }
}

/// Standings of one expedition group.
pub fn group_standings(tournament: &Tournament, group_index: usize) -> Vec<StandingEntry> {
    match &tournament.schedule {
        Schedule::Expedition { groups, .. } => groups
            .get(group_index)
            .map(|g| standings(&g.records))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Finish the in-progress match: resolve the winning team, propagate the
/// result, log the match, and return to idle.
fn complete_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    winning_side: Side,
) -> Result<Vec<Notification>, TournamentError> {
    let winner = side_team(tournament, match_id, winning_side)?;
    let sets = tournament
        .live
        .as_ref()
        .map(|e| e.history().to_vec())
        .unwrap_or_default();

    let events = progression::record_result(&mut tournament.schedule, match_id, winner)?;
    push_history(tournament, match_id, Some(winner), sets)?;
    tournament.phase = MatchPhase::Idle;
    tournament.live = None;

    let mut notifications = vec![Notification::MatchWon {
        team: tournament.team_name(winner).to_string(),
    }];
    notifications.extend(event_notifications(tournament, &events));
    Ok(notifications)
}

fn event_notifications(tournament: &Tournament, events: &[ProgressEvent]) -> Vec<Notification> {
    let mut notifications = Vec::new();
    for event in events {
        match event {
            ProgressEvent::GroupDecided {
                group_index,
                winner,
            } => notifications.push(Notification::GroupDecided {
                group: group_index + 1,
                team: tournament.team_name(*winner).to_string(),
            }),
            ProgressEvent::Complete {
                champion: Some(team),
            } => notifications.push(Notification::TournamentWon {
                team: tournament.team_name(*team).to_string(),
            }),
            ProgressEvent::Complete { champion: None } => {}
        }
    }
    notifications
}

fn side_team(
    tournament: &Tournament,
    match_id: MatchId,
    side: Side,
) -> Result<TeamId, TournamentError> {
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotInSchedule(match_id))?;
    m.slot(side)
        .team()
        .ok_or(TournamentError::MatchNotPlayable(match_id))
}

fn side_name(
    tournament: &Tournament,
    match_id: MatchId,
    side: Side,
) -> Result<String, TournamentError> {
    let id = side_team(tournament, match_id, side)?;
    Ok(tournament.team_name(id).to_string())
}

fn push_history(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: Option<TeamId>,
    sets: Vec<SetScore>,
) -> Result<(), TournamentError> {
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotInSchedule(match_id))?;
    let (team_a, team_b) = match (m.team_a.team(), m.team_b.team()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(TournamentError::MatchNotPlayable(match_id)),
    };
    tournament.history.push(MatchRecord {
        match_id,
        team_a,
        team_b,
        winner,
        sets,
        completed_at: Utc::now(),
    });
    Ok(())
}
