//! Round-robin standings: per-team stats, ranking rules and the derived state.

use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Points for a won match.
pub const POINTS_WIN: u32 = 2;
/// Points for a drawn match.
pub const POINTS_DRAW: u32 = 1;

/// Accumulated results of one team.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub matches: u32,
}

impl TeamStats {
    pub fn add_win(&mut self) {
        self.wins += 1;
        self.matches += 1;
        self.update_points();
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.matches += 1;
        self.update_points();
    }

    pub fn add_draw(&mut self) {
        self.draws += 1;
        self.matches += 1;
        self.update_points();
    }

    fn update_points(&mut self) {
        self.points = self.wins * POINTS_WIN + self.draws * POINTS_DRAW;
    }
}

/// Orders stats so that the better team sorts first.
pub type RankingComparator = fn(&TeamStats, &TeamStats) -> Ordering;

/// Default ranking: more points first, nothing else considered.
pub fn by_points(a: &TeamStats, b: &TeamStats) -> Ordering {
    b.points.cmp(&a.points)
}

/// Points first, then number of wins.
pub fn by_points_then_wins(a: &TeamStats, b: &TeamStats) -> Ordering {
    by_points(a, b).then_with(|| b.wins.cmp(&a.wins))
}

/// Configurable selection of a ranking comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingRule {
    #[default]
    Points,
    PointsThenWins,
}

impl RankingRule {
    pub fn comparator(self) -> RankingComparator {
        match self {
            RankingRule::Points => by_points,
            RankingRule::PointsThenWins => by_points_then_wins,
        }
    }
}

/// Snapshot of the round-robin stage. Derived on demand, never stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinState {
    pub matches_played: usize,
    pub matches_total: usize,
    /// Best team first.
    pub ranking: Vec<(Team, TeamStats)>,
}

impl RoundRobinState {
    pub fn is_complete(&self) -> bool {
        self.matches_played == self.matches_total
    }

    /// Teams in ranking order.
    pub fn ranked_teams(&self) -> impl Iterator<Item = &Team> {
        self.ranking.iter().map(|(team, _)| team)
    }

    /// Header line for printed standings, e.g. "Ranking after 3 matches (7 to go):".
    pub fn summary_line(&self) -> String {
        let es = if self.matches_played != 1 { "es" } else { "" };
        format!(
            "Ranking after {} match{} ({} to go):",
            self.matches_played,
            es,
            self.matches_total - self.matches_played
        )
    }
}
