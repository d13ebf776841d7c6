//! Schedule generation for the three tournament formats.
//!
//! The roster order is the only seeding signal: single elimination pairs
//! consecutive teams, round robin enumerates pairs in index order, and
//! expedition fills groups of four in list order.

use crate::models::{
    Bracket, GameMatch, Group, RoundRobinRecord, Schedule, Slot, Team, TeamId, TournamentFormat,
    EXPEDITION_GROUP_SIZE,
};
use std::collections::HashMap;

/// Generate the schedule for the given roster and format. Zero or one team
/// produces an empty schedule (nothing to play, not an error).
pub fn generate(teams: &[Team], format: TournamentFormat) -> Schedule {
    if teams.len() < 2 {
        return Schedule::Empty;
    }
    let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    match format {
        TournamentFormat::SingleElimination => Schedule::SingleElimination {
            bracket: single_elimination(&ids),
        },
        TournamentFormat::RoundRobin => {
            let matches = round_robin(&ids);
            Schedule::RoundRobin {
                matches,
                records: blank_records(&ids),
            }
        }
        TournamentFormat::Expedition => expedition(&ids),
    }
}

/// Single elimination bracket: `ceil(log2(n))` rounds. Round 1 pairs
/// consecutive seeds, with a BYE for an unpaired trailing team. Later rounds
/// are TBD placeholders; when a round has an odd match count, the next
/// round's last match carries a structural BYE in slot B so the odd winner
/// advances automatically.
pub fn single_elimination(ids: &[TeamId]) -> Bracket {
    let mut rounds = Vec::new();

    let mut first = Vec::with_capacity(ids.len().div_ceil(2));
    for pair in ids.chunks(2) {
        let team_a = Slot::Team(pair[0]);
        let team_b = pair.get(1).map(|id| Slot::Team(*id)).unwrap_or(Slot::Bye);
        first.push(GameMatch::new(team_a, team_b));
    }
    let mut prev_len = first.len();
    rounds.push(first);

    while prev_len > 1 {
        let len = prev_len.div_ceil(2);
        let mut round: Vec<GameMatch> = (0..len).map(|_| GameMatch::placeholder()).collect();
        if prev_len % 2 == 1 {
            // Odd feeder count: the last placeholder only ever receives one
            // winner, so its other side is a bye.
            if let Some(last) = round.last_mut() {
                last.team_b = Slot::Bye;
            }
        }
        rounds.push(round);
        prev_len = len;
    }

    Bracket { rounds }
}

/// Round robin: every unordered pair exactly once, generated by the `i < j`
/// double loop over team indices. The resulting order is the playing order.
pub fn round_robin(ids: &[TeamId]) -> Vec<GameMatch> {
    let mut matches = Vec::with_capacity(ids.len() * (ids.len() - 1) / 2);
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            matches.push(GameMatch::new(Slot::Team(ids[i]), Slot::Team(ids[j])));
        }
    }
    matches
}

fn blank_records(ids: &[TeamId]) -> HashMap<TeamId, RoundRobinRecord> {
    ids.iter()
        .map(|id| (*id, RoundRobinRecord::default()))
        .collect()
}

/// Expedition: groups of four in list order (last group may be smaller),
/// each running an independent round robin, with a knockout bracket over one
/// slot per group. Knockout slots stay TBD until a group completes and its
/// winner is promoted. A single group gets no knockout stage.
fn expedition(ids: &[TeamId]) -> Schedule {
    let groups: Vec<Group> = ids
        .chunks(EXPEDITION_GROUP_SIZE)
        .map(|members| Group {
            members: members.to_vec(),
            matches: if members.len() > 1 {
                round_robin(members)
            } else {
                Vec::new()
            },
            records: blank_records(members),
            promoted: None,
        })
        .collect();

    let knockout = if groups.len() > 1 {
        placeholder_bracket(groups.len())
    } else {
        Bracket::default()
    };

    Schedule::Expedition { groups, knockout }
}

/// Knockout bracket shaped for `n` entrants that are not known yet: same
/// structure as `single_elimination`, all round-1 slots TBD (with a BYE for
/// an odd entrant count).
fn placeholder_bracket(n: usize) -> Bracket {
    let mut rounds = Vec::new();
    let mut first: Vec<GameMatch> = (0..n / 2).map(|_| GameMatch::placeholder()).collect();
    if n % 2 == 1 {
        first.push(GameMatch::new(Slot::Tbd, Slot::Bye));
    }
    let mut prev_len = first.len();
    rounds.push(first);
    while prev_len > 1 {
        let len = prev_len.div_ceil(2);
        let mut round: Vec<GameMatch> = (0..len).map(|_| GameMatch::placeholder()).collect();
        if prev_len % 2 == 1 {
            if let Some(last) = round.last_mut() {
                last.team_b = Slot::Bye;
            }
        }
        rounds.push(round);
        prev_len = len;
    }
    Bracket { rounds }
}
