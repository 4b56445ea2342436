//! Tournament business logic: seeding, stages, bracket tree and rendering.

mod bracket;
mod export;
mod knockout;
mod last_chance;
mod render;
mod round_robin;
mod seeding;
mod stage;
mod tournament;

pub use bracket::BracketTree;
pub use export::{read_teams_csv, standings_json, write_standings_csv};
pub use knockout::{prepare_knockout_matches, KnockoutStage, DEFAULT_NUM_REPLAYS};
pub use last_chance::{prepare_last_chance_matches, LastChanceStage, SUPPORTED_CHALLENGER_COUNTS};
pub use render::{print_tree, BracketRenderer};
pub use round_robin::{create_matchplan, MatchPlan, Pairing, Rest, RoundRobinStage};
pub use seeding::{
    bracket_rounds, seed_order, seeded, sort_ranks, RankPairing, SUPPORTED_BRACKET_SIZES,
};
pub use stage::{MatchBook, PlayMatch, Roster, TournamentStage};
pub use tournament::Tournament;
