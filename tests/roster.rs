//! Integration tests for roster import and standings ordering.

use std::collections::HashMap;
use table_tennis_tournament_web::{
    parse_roster_csv, standings, RoundRobinRecord, TeamId,
};

#[test]
fn csv_roster_preserves_order_and_skips_blanks() {
    let data = "name\nAlpha\nBravo\n\n  Charlie  \n";
    let teams = parse_roster_csv(data).unwrap();
    let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
}

#[test]
fn csv_roster_without_header_keeps_first_row() {
    let data = "Alpha,extra\nBravo\n";
    let teams = parse_roster_csv(data).unwrap();
    let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
}

#[test]
fn standings_break_point_ties_by_team_id() {
    let a = TeamId::new_v4();
    let b = TeamId::new_v4();
    let mut records: HashMap<TeamId, RoundRobinRecord> = HashMap::new();
    let mut rec_a = RoundRobinRecord::default();
    rec_a.record_win(b);
    let mut rec_b = RoundRobinRecord::default();
    rec_b.record_win(a);
    records.insert(a, rec_a);
    records.insert(b, rec_b);

    let table = standings(&records);
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    assert_eq!(table[0].team, low);
    assert_eq!(table[1].team, high);
    assert_eq!(table[0].points, table[1].points);
}
