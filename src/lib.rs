//! Maze tournament scheduler: library with models and business logic.
//!
//! A tournament runs a round robin, seeds the best teams into a knockout bracket and can
//! finish with a last-chance final. Matches are decided by an external [`PlayMatch`]
//! implementation; the engine only schedules, records and ranks.

pub mod logic;
pub mod models;

pub use logic::{
    bracket_rounds, create_matchplan, prepare_knockout_matches, prepare_last_chance_matches,
    print_tree, read_teams_csv, seed_order, seeded, sort_ranks, standings_json,
    write_standings_csv, BracketRenderer, BracketTree, KnockoutStage, LastChanceStage, MatchBook,
    MatchPlan, Pairing, PlayMatch, RankPairing, Rest, Roster, RoundRobinStage, Tournament,
    TournamentStage, DEFAULT_NUM_REPLAYS,
};
pub use models::{
    by_points, by_points_then_wins, LastChancePolicy, Match, MatchGame, MatchId, MatchKey,
    MatchResult, RankingRule, RoundRobinState, StageKind, Team, TeamId, TeamStats,
    TournamentConfig, TournamentError, TournamentPhase, POINTS_DRAW, POINTS_WIN,
};
