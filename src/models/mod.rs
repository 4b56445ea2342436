//! Data structures for the tournament: teams, matches, standings, configuration.

mod config;
mod game;
mod standings;
mod team;
mod tournament;

pub use config::{LastChancePolicy, TournamentConfig};
pub use game::{Match, MatchGame, MatchGameId, MatchId, MatchKey, MatchResult, StageKind};
pub use standings::{
    by_points, by_points_then_wins, RankingComparator, RankingRule, RoundRobinState, TeamStats,
    POINTS_DRAW, POINTS_WIN,
};
pub use team::{Team, TeamId};
pub use tournament::{TournamentError, TournamentPhase};
