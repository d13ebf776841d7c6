//! Roster import: build a team list from CSV text.

use crate::models::Team;

/// Parse a roster from CSV. The first column of each record is the team
/// name; a `name` header row is skipped. Blank names are ignored, so a
/// malformed list degrades to fewer teams rather than failing the setup.
pub fn parse_roster_csv(data: &str) -> Result<Vec<Team>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());
    let mut teams = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(name) = record.get(0).map(str::trim) else {
            continue;
        };
        if name.is_empty() || (teams.is_empty() && name.eq_ignore_ascii_case("name")) {
            continue;
        }
        teams.push(Team::new(name));
    }
    Ok(teams)
}
