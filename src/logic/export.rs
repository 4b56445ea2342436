//! Import of team lists and export of standings (CSV / JSON).

use crate::models::{RoundRobinState, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One row of the standings CSV.
#[derive(Debug, Serialize)]
struct StandingsRow<'a> {
    rank: usize,
    id: TeamId,
    name: &'a str,
    points: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    matches: u32,
}

/// One row of a team list CSV (`id,name`).
#[derive(Debug, Deserialize)]
struct TeamRow {
    id: TeamId,
    name: String,
}

/// Write the ranking as CSV with a header row, best team first.
pub fn write_standings_csv<W: Write>(state: &RoundRobinState, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for (idx, (team, stats)) in state.ranking.iter().enumerate() {
        out.serialize(StandingsRow {
            rank: idx + 1,
            id: team.id,
            name: &team.name,
            points: stats.points,
            wins: stats.wins,
            losses: stats.losses,
            draws: stats.draws,
            matches: stats.matches,
        })?;
    }
    out.flush()?;
    Ok(())
}

/// Read teams from CSV with an `id,name` header. Surrounding whitespace is trimmed.
pub fn read_teams_csv<R: Read>(reader: R) -> Result<Vec<Team>, csv::Error> {
    let mut rows = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rows.deserialize::<TeamRow>()
        .map(|row| row.map(|r| Team::new(r.id, r.name)))
        .collect()
}

/// Standings as pretty-printed JSON.
pub fn standings_json(state: &RoundRobinState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}
