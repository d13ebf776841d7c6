//! Integration tests for the match-session lifecycle: select, start, score,
//! end set, end match, and schedule regeneration.

use table_tennis_tournament_web::{
    add_point, decrement_point, end_match, end_set, load_roster, select_match, set_config,
    start_match, MatchPhase, MatchStatus, Notification, Schedule, Side, Team, Tournament,
    TournamentConfig, TournamentError, TournamentFormat,
};

fn tournament(n: usize, format: TournamentFormat, set_count: u32) -> Tournament {
    let config = TournamentConfig {
        format,
        set_count,
        ..TournamentConfig::default()
    };
    let mut t = Tournament::new(config);
    let teams: Vec<Team> = (0..n).map(|i| Team::new(format!("Team {i}"))).collect();
    load_roster(&mut t, teams);
    t
}

fn first_match_id(t: &Tournament) -> table_tennis_tournament_web::MatchId {
    match &t.schedule {
        Schedule::SingleElimination { bracket } => bracket.rounds[0][0].id,
        Schedule::RoundRobin { matches, .. } => matches[0].id,
        _ => panic!("unexpected schedule"),
    }
}

fn score_points(t: &mut Tournament, a: u32, b: u32) {
    for _ in 0..a {
        add_point(t, Side::A).unwrap();
    }
    for _ in 0..b {
        add_point(t, Side::B).unwrap();
    }
}

#[test]
fn start_without_selection_reports_no_match_selected() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 3);
    let err = start_match(&mut t).unwrap_err();
    assert_eq!(err, TournamentError::NoMatchSelected);
    assert!(!err.is_invariant());
}

#[test]
fn scoring_requires_a_match_in_progress() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 3);
    assert_eq!(
        add_point(&mut t, Side::A),
        Err(TournamentError::NoMatchInProgress)
    );
    let m = first_match_id(&t);
    select_match(&mut t, m).unwrap();
    // Selected but not started: still no live score.
    assert_eq!(
        decrement_point(&mut t, Side::B),
        Err(TournamentError::NoMatchInProgress)
    );
}

#[test]
fn selected_match_shows_as_in_progress() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 3);
    let m = first_match_id(&t);
    select_match(&mut t, m).unwrap();
    let selected = t.find_match(m).unwrap();
    assert_eq!(t.match_status(selected), MatchStatus::InProgress);
    let Schedule::SingleElimination { bracket } = &t.schedule else {
        panic!("expected a single elimination bracket");
    };
    assert_eq!(
        t.match_status(&bracket.rounds[0][1]),
        MatchStatus::Pending
    );
}

#[test]
fn end_set_before_win_rule_is_satisfied_reports_ongoing() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 3);
    let m = first_match_id(&t);
    select_match(&mut t, m).unwrap();
    start_match(&mut t).unwrap();
    score_points(&mut t, 10, 8);
    assert_eq!(end_set(&mut t), Err(TournamentError::SetStillOngoing));
    // The session survives the rejected end-set.
    assert_eq!(t.phase, MatchPhase::InProgress { match_id: m });
}

#[test]
fn winning_enough_sets_completes_the_match_and_promotes() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 3);
    let ids: Vec<_> = t.roster.iter().map(|team| team.id).collect();
    let m = first_match_id(&t);
    select_match(&mut t, m).unwrap();
    start_match(&mut t).unwrap();

    score_points(&mut t, 11, 4);
    let notes = end_set(&mut t).unwrap();
    assert!(matches!(
        notes.as_slice(),
        [Notification::SetWon { set_number: 1, .. }]
    ));

    score_points(&mut t, 11, 9);
    let notes = end_set(&mut t).unwrap();
    assert!(notes
        .iter()
        .any(|n| matches!(n, Notification::MatchWon { team } if team == "Team 0")));

    // Back to idle, winner promoted into the next round.
    assert_eq!(t.phase, MatchPhase::Idle);
    assert!(t.live.is_none());
    let Schedule::SingleElimination { bracket } = &t.schedule else {
        panic!("expected a single elimination bracket");
    };
    assert_eq!(bracket.rounds[0][0].winner, Some(ids[0]));
    assert_eq!(
        bracket.rounds[1][0].team_a.team(),
        Some(ids[0])
    );
    // One history entry with both banked sets.
    assert_eq!(t.history.len(), 1);
    let record = &t.history[0];
    assert_eq!(record.winner, Some(ids[0]));
    assert_eq!(record.sets.len(), 2);
    assert_eq!(record.sets[1].score_b, 9);
}

#[test]
fn end_match_before_decision_abandons_without_recording() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 3);
    let m = first_match_id(&t);
    select_match(&mut t, m).unwrap();
    start_match(&mut t).unwrap();
    score_points(&mut t, 11, 2);
    end_set(&mut t).unwrap();
    score_points(&mut t, 5, 3);

    let notes = end_match(&mut t).unwrap();
    assert_eq!(notes, vec![Notification::MatchAbandoned]);
    assert_eq!(t.phase, MatchPhase::Idle);

    // Nothing entered the bracket; the match can be replayed.
    let replay = t.find_match(m).unwrap();
    assert!(replay.winner.is_none());
    assert!(replay.is_playable());
    // The abandoned session is still logged, with no winner.
    assert_eq!(t.history.len(), 1);
    assert_eq!(t.history[0].winner, None);
    assert_eq!(t.history[0].sets.len(), 1);
}

#[test]
fn selecting_while_scoring_is_rejected() {
    let mut t = tournament(4, TournamentFormat::RoundRobin, 3);
    let ids: Vec<_> = match &t.schedule {
        Schedule::RoundRobin { matches, .. } => matches.iter().map(|m| m.id).collect(),
        _ => panic!("expected a round robin schedule"),
    };
    select_match(&mut t, ids[0]).unwrap();
    // Re-selection before starting is allowed.
    select_match(&mut t, ids[1]).unwrap();
    start_match(&mut t).unwrap();
    assert_eq!(
        select_match(&mut t, ids[0]),
        Err(TournamentError::MatchAlreadyInProgress)
    );
    assert_eq!(start_match(&mut t), Err(TournamentError::MatchAlreadyInProgress));
}

#[test]
fn bye_and_completed_matches_cannot_be_selected() {
    let mut t = tournament(3, TournamentFormat::SingleElimination, 3);
    let Schedule::SingleElimination { bracket } = &t.schedule else {
        panic!("expected a single elimination bracket");
    };
    let bye = bracket.rounds[0][1].id;
    let placeholder = bracket.rounds[1][0].id;
    assert_eq!(
        select_match(&mut t, bye),
        Err(TournamentError::MatchNotPlayable(bye))
    );
    // The final still has a TBD slot.
    assert_eq!(
        select_match(&mut t, placeholder),
        Err(TournamentError::MatchNotPlayable(placeholder))
    );
}

#[test]
fn reconfiguration_discards_the_whole_snapshot() {
    let mut t = tournament(4, TournamentFormat::RoundRobin, 3);
    let m = first_match_id(&t);
    select_match(&mut t, m).unwrap();
    start_match(&mut t).unwrap();
    score_points(&mut t, 7, 2);

    let config = TournamentConfig {
        format: TournamentFormat::SingleElimination,
        ..t.config
    };
    set_config(&mut t, config);

    assert_eq!(t.phase, MatchPhase::Idle);
    assert!(t.live.is_none());
    assert!(t.history.is_empty());
    assert!(matches!(t.schedule, Schedule::SingleElimination { .. }));
    // The old match id is gone with the old schedule.
    assert!(t.find_match(m).is_none());
}

#[test]
fn current_matchups_follow_the_active_round() {
    let mut t = tournament(4, TournamentFormat::SingleElimination, 1);
    assert_eq!(t.current_round(), 1);
    assert_eq!(t.current_matchups().len(), 2);

    let ids: Vec<_> = t.roster.iter().map(|team| team.id).collect();
    let round1: Vec<_> = match &t.schedule {
        Schedule::SingleElimination { bracket } => {
            bracket.rounds[0].iter().map(|m| m.id).collect()
        }
        _ => panic!("expected a single elimination bracket"),
    };
    table_tennis_tournament_web::record_result(&mut t, round1[0], ids[0]).unwrap();
    table_tennis_tournament_web::record_result(&mut t, round1[1], ids[3]).unwrap();

    assert_eq!(t.current_round(), 2);
    let matchups = t.current_matchups();
    assert_eq!(matchups.len(), 1);
    assert_eq!(matchups[0].team_a.team(), Some(ids[0]));
    assert_eq!(matchups[0].team_b.team(), Some(ids[3]));
}
