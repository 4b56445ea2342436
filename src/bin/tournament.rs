//! Runs a complete mock tournament and prints standings and the bracket.
//! Run with: cargo run --bin tournament
//!
//! Environment:
//! - TEAMS: number of generated teams (default 5), or TEAMS_CSV: path to an `id,name` CSV
//! - CONFIG: path to a JSON config; otherwise KNOCKOUT_TEAMS, NUM_REPLAYS, RANKING,
//!   LAST_CHANCE and SKIP_ROUND_ROBIN are read directly
//! - SEED: seed of the mock results (default 1)
//! - STANDINGS_CSV: write the final round-robin standings to this path

use maze_tournament::{
    read_teams_csv, write_standings_csv, BracketRenderer, Match, MatchResult, Roster, Team,
    Tournament, TournamentConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs::File;

fn default_team_count() -> usize {
    5
}

fn default_seed() -> u64 {
    1
}

fn load_teams() -> Result<Vec<Team>, Box<dyn Error>> {
    if let Ok(path) = std::env::var("TEAMS_CSV") {
        log::info!("Reading teams from {}", path);
        return Ok(read_teams_csv(File::open(path)?)?);
    }
    let count = std::env::var("TEAMS")
        .ok()
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(default_team_count);
    Ok(Roster::numbered(count)?.teams().to_vec())
}

fn load_config() -> Result<TournamentConfig, Box<dyn Error>> {
    match std::env::var("CONFIG") {
        Ok(path) => {
            log::info!("Reading config from {}", path);
            Ok(TournamentConfig::from_json_str(&std::fs::read_to_string(path)?)?)
        }
        Err(_) => Ok(TournamentConfig::from_env()),
    }
}

/// Mostly decisive random results; roughly one game in eight is a draw.
fn mock_result(rng: &mut StdRng) -> MatchResult {
    match rng.gen_range(0..8) {
        0..=3 => MatchResult::Blue,
        4..=6 => MatchResult::Red,
        _ => MatchResult::Draw,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let teams = load_teams()?;
    let config = load_config()?;
    let seed = std::env::var("SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(default_seed);
    log::info!("Starting tournament with {} teams ({:?})", teams.len(), config);

    let mut tournament = Tournament::new(teams, config)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut play = |game: &Match, blue: &Team, red: &Team| {
        log::info!(
            "Playing mock game {:?} round {} match {}: {} against {}",
            game.stage,
            game.round,
            game.match_id,
            blue.name,
            red.name
        );
        let result = mock_result(&mut rng);
        (result, serde_json::json!({ "seed": seed, "result": result }))
    };
    let champion = tournament.run(&mut play)?;

    if let Some(state) = tournament.standings()? {
        println!("{}", state.summary_line());
        for (team, stats) in &state.ranking {
            println!(
                "  {:>25} {:>3} pts  {}W {}D {}L",
                format!("{} ({})", team.name, team.matches_played),
                stats.points,
                stats.wins,
                stats.draws,
                stats.losses
            );
        }
        println!();
        if let Ok(path) = std::env::var("STANDINGS_CSV") {
            write_standings_csv(&state, File::create(&path)?)?;
            log::info!("Standings written to {}", path);
        }
    }

    let champion_name = tournament.roster().name(champion);
    let renderer = BracketRenderer::new().with_highlight([champion_name.clone()]);
    println!("{}", tournament.render_bracket(&renderer)?);
    println!();
    println!("Champion: {}", champion_name);
    Ok(())
}
