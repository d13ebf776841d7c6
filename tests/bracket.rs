//! Integration tests for schedule generation across the three formats.

use std::collections::HashSet;
use table_tennis_tournament_web::{
    load_roster, Schedule, Slot, Team, Tournament, TournamentConfig, TournamentFormat,
};

fn tournament_with_teams(n: usize, format: TournamentFormat) -> Tournament {
    let config = TournamentConfig {
        format,
        ..TournamentConfig::default()
    };
    let mut t = Tournament::new(config);
    let teams: Vec<Team> = (0..n).map(|i| Team::new(format!("Team {i}"))).collect();
    load_roster(&mut t, teams);
    t
}

fn ceil_log2(n: usize) -> usize {
    let mut rounds = 0;
    let mut capacity = 1;
    while capacity < n {
        capacity *= 2;
        rounds += 1;
    }
    rounds
}

#[test]
fn fewer_than_two_teams_yields_empty_schedule() {
    for n in [0, 1] {
        let t = tournament_with_teams(n, TournamentFormat::SingleElimination);
        assert_eq!(t.schedule, Schedule::Empty);
    }
}

#[test]
fn single_elimination_round_and_match_counts() {
    for n in 2..=16 {
        let t = tournament_with_teams(n, TournamentFormat::SingleElimination);
        let Schedule::SingleElimination { bracket } = &t.schedule else {
            panic!("expected a single elimination bracket");
        };
        assert_eq!(bracket.rounds.len(), ceil_log2(n), "rounds for {n} teams");
        assert_eq!(
            bracket.rounds[0].len(),
            n.div_ceil(2),
            "round 1 matches for {n} teams"
        );
        assert_eq!(bracket.rounds.last().unwrap().len(), 1);
    }
}

#[test]
fn single_elimination_pairs_consecutive_seeds() {
    let t = tournament_with_teams(4, TournamentFormat::SingleElimination);
    let Schedule::SingleElimination { bracket } = &t.schedule else {
        panic!("expected a single elimination bracket");
    };
    let ids: Vec<_> = t.roster.iter().map(|team| team.id).collect();
    assert_eq!(bracket.rounds[0][0].team_a, Slot::Team(ids[0]));
    assert_eq!(bracket.rounds[0][0].team_b, Slot::Team(ids[1]));
    assert_eq!(bracket.rounds[0][1].team_a, Slot::Team(ids[2]));
    assert_eq!(bracket.rounds[0][1].team_b, Slot::Team(ids[3]));
    // Round 2 is placeholders until results come in.
    assert_eq!(bracket.rounds[1][0].team_a, Slot::Tbd);
    assert_eq!(bracket.rounds[1][0].team_b, Slot::Tbd);
}

#[test]
fn odd_team_count_gets_a_bye_that_advances_automatically() {
    let t = tournament_with_teams(3, TournamentFormat::SingleElimination);
    let Schedule::SingleElimination { bracket } = &t.schedule else {
        panic!("expected a single elimination bracket");
    };
    let ids: Vec<_> = t.roster.iter().map(|team| team.id).collect();
    let bye_match = &bracket.rounds[0][1];
    assert_eq!(bye_match.team_a, Slot::Team(ids[2]));
    assert_eq!(bye_match.team_b, Slot::Bye);
    // The unopposed team is already through to the final's B slot.
    assert_eq!(bye_match.winner, Some(ids[2]));
    assert_eq!(bracket.rounds[1][0].team_b, Slot::Team(ids[2]));
}

#[test]
fn round_robin_produces_each_pair_exactly_once() {
    for n in 2..=8 {
        let t = tournament_with_teams(n, TournamentFormat::RoundRobin);
        let Schedule::RoundRobin { matches, records } = &t.schedule else {
            panic!("expected a round robin schedule");
        };
        assert_eq!(matches.len(), n * (n - 1) / 2);
        assert_eq!(records.len(), n);
        let mut pairs = HashSet::new();
        for m in matches {
            let a = m.team_a.team().unwrap();
            let b = m.team_b.team().unwrap();
            assert_ne!(a, b);
            let key = if a < b { (a, b) } else { (b, a) };
            assert!(pairs.insert(key), "duplicate pair in schedule");
        }
    }
}

#[test]
fn round_robin_three_teams_plays_in_index_order() {
    let t = tournament_with_teams(3, TournamentFormat::RoundRobin);
    let Schedule::RoundRobin { matches, .. } = &t.schedule else {
        panic!("expected a round robin schedule");
    };
    let ids: Vec<_> = t.roster.iter().map(|team| team.id).collect();
    let order: Vec<_> = matches
        .iter()
        .map(|m| (m.team_a.team().unwrap(), m.team_b.team().unwrap()))
        .collect();
    assert_eq!(
        order,
        vec![(ids[0], ids[1]), (ids[0], ids[2]), (ids[1], ids[2])]
    );
}

#[test]
fn expedition_partitions_into_groups_of_four_in_list_order() {
    let t = tournament_with_teams(10, TournamentFormat::Expedition);
    let Schedule::Expedition { groups, knockout } = &t.schedule else {
        panic!("expected an expedition schedule");
    };
    let ids: Vec<_> = t.roster.iter().map(|team| team.id).collect();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].members, &ids[0..4]);
    assert_eq!(groups[1].members, &ids[4..8]);
    assert_eq!(groups[2].members, &ids[8..10]);
    // Each group is an independent round robin.
    assert_eq!(groups[0].matches.len(), 6);
    assert_eq!(groups[1].matches.len(), 6);
    assert_eq!(groups[2].matches.len(), 1);
    // Knockout over 3 group winners: 2 + 1 matches, all slots undecided.
    assert_eq!(knockout.rounds.len(), 2);
    assert_eq!(knockout.rounds[0].len(), 2);
    assert_eq!(knockout.rounds[0][0].team_a, Slot::Tbd);
    assert_eq!(knockout.rounds[0][1].team_b, Slot::Bye);
}

#[test]
fn expedition_with_a_single_group_has_no_knockout() {
    let t = tournament_with_teams(4, TournamentFormat::Expedition);
    let Schedule::Expedition { groups, knockout } = &t.schedule else {
        panic!("expected an expedition schedule");
    };
    assert_eq!(groups.len(), 1);
    assert!(knockout.is_empty());
}

#[test]
fn unrecognized_format_falls_back_to_single_elimination() {
    assert_eq!(
        TournamentFormat::parse("banana"),
        TournamentFormat::SingleElimination
    );
    assert_eq!(
        TournamentFormat::parse("Round Robin"),
        TournamentFormat::RoundRobin
    );
    let config: TournamentConfig =
        serde_json::from_str(r#"{ "format": "double_elimination" }"#).unwrap();
    assert_eq!(config.format, TournamentFormat::SingleElimination);
    let config: TournamentConfig = serde_json::from_str(r#"{ "format": "expedition" }"#).unwrap();
    assert_eq!(config.format, TournamentFormat::Expedition);
}
