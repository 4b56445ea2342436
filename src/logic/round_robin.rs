//! Round-robin stage: schedule, result recording and live standings.

use crate::logic::seeding::sort_ranks;
use crate::logic::stage::{MatchBook, Roster, TournamentStage};
use crate::models::{
    by_points, Match, MatchKey, MatchResult, RankingComparator, RoundRobinState, StageKind,
    TeamId, TeamStats, TournamentError,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One scheduled pairing of the round-robin plan.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub matchday: usize,
    pub blue: TeamId,
    pub red: TeamId,
}

/// A team without an opponent on a matchday (odd team count). It plays no match that day
/// and gets no points for it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub matchday: usize,
    pub team: TeamId,
}

/// Full round-robin plan: every unordered pair exactly once.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchPlan {
    pub pairings: Vec<Pairing>,
    pub rests: Vec<Rest>,
}

/// Circle-method schedule. The first matchday pairs neighbours in the given order
/// (first with second, third with fourth, ...); with an odd count the last team rests on it.
pub fn create_matchplan(teams: &[TeamId]) -> MatchPlan {
    let mut slots: Vec<Option<TeamId>> = teams.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return MatchPlan::default();
    }

    // circle[i] faces circle[n - 1 - i]
    let mut circle = vec![None; n];
    for i in 0..n / 2 {
        circle[i] = slots[2 * i];
        circle[n - 1 - i] = slots[2 * i + 1];
    }

    let mut plan = MatchPlan::default();
    for matchday in 0..n - 1 {
        for i in 0..n / 2 {
            let (mut first, mut second) = (circle[i], circle[n - 1 - i]);
            // The fixed team changes sides every matchday.
            if i == 0 && matchday % 2 == 1 {
                std::mem::swap(&mut first, &mut second);
            }
            match (first, second) {
                (Some(blue), Some(red)) => plan.pairings.push(Pairing {
                    matchday,
                    blue,
                    red,
                }),
                (Some(team), None) | (None, Some(team)) => plan.rests.push(Rest { matchday, team }),
                (None, None) => {}
            }
        }
        circle[1..].rotate_right(1);
    }
    plan
}

/// Every team plays every other team once; draws count.
#[derive(Clone, Debug)]
pub struct RoundRobinStage {
    teams: Vec<TeamId>,
    book: MatchBook,
    rests: Vec<Rest>,
    comparator: RankingComparator,
}

impl RoundRobinStage {
    /// Schedule in the given order.
    pub fn new(teams: Vec<TeamId>) -> Result<Self, TournamentError> {
        if teams.is_empty() {
            return Err(TournamentError::EmptyTeamList);
        }
        let plan = create_matchplan(&teams);
        Ok(Self::from_plan(teams, plan))
    }

    /// Schedule for a ranked list (best first): the first matchday pairs the strongest with
    /// the weakest team. With `bonus_match` the worst team is left out of the regular plan
    /// and plays all of its matches after everybody else.
    pub fn seeded(ranked: Vec<TeamId>, bonus_match: bool) -> Result<Self, TournamentError> {
        if ranked.is_empty() {
            return Err(TournamentError::EmptyTeamList);
        }
        let mut pairing = sort_ranks(ranked.clone(), bonus_match);
        let bonus = pairing.bonus.take();
        let order = pairing.into_order();

        let mut plan = create_matchplan(&order);
        if let Some(bonus) = bonus {
            let matchday = plan
                .pairings
                .iter()
                .map(|p| p.matchday + 1)
                .chain(plan.rests.iter().map(|r| r.matchday + 1))
                .max()
                .unwrap_or(0);
            for (offset, &opponent) in order.iter().enumerate() {
                plan.pairings.push(Pairing {
                    matchday: matchday + offset,
                    blue: opponent,
                    red: bonus,
                });
            }
        }
        Ok(Self::from_plan(ranked, plan))
    }

    fn from_plan(teams: Vec<TeamId>, plan: MatchPlan) -> Self {
        let matches = plan
            .pairings
            .iter()
            .enumerate()
            .map(|(idx, p)| Match::between(idx, StageKind::RoundRobin, 0, p.blue, p.red))
            .collect();
        log::info!(
            "Round robin: {} teams, {} matches",
            teams.len(),
            plan.pairings.len()
        );
        Self {
            teams,
            book: MatchBook::new(StageKind::RoundRobin, matches, true, 1),
            rests: plan.rests,
            comparator: by_points,
        }
    }

    /// Use another comparator for `ranking` (default: points only).
    pub fn with_comparator(mut self, comparator: RankingComparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    /// Matchdays on which a team has no opponent.
    pub fn rests(&self) -> &[Rest] {
        &self.rests
    }

    /// Stats per team in stage order, counting decided matches only.
    pub fn standings(&self) -> Vec<(TeamId, TeamStats)> {
        let mut stats: HashMap<TeamId, TeamStats> =
            self.teams.iter().map(|&id| (id, TeamStats::default())).collect();

        for game in self.book.matches() {
            let (Some(result), Some((blue, red))) = (game.winner, game.teams()) else {
                continue;
            };
            match result {
                MatchResult::Blue => {
                    stats.entry(blue).or_default().add_win();
                    stats.entry(red).or_default().add_loss();
                }
                MatchResult::Red => {
                    stats.entry(red).or_default().add_win();
                    stats.entry(blue).or_default().add_loss();
                }
                MatchResult::Draw => {
                    stats.entry(blue).or_default().add_draw();
                    stats.entry(red).or_default().add_draw();
                }
            }
        }

        self.teams
            .iter()
            .map(|id| (*id, stats.get(id).copied().unwrap_or_default()))
            .collect()
    }

    /// Stable sort of `standings` by `compare`; equal teams keep stage order.
    pub fn ranking_by(
        &self,
        mut compare: impl FnMut(&TeamStats, &TeamStats) -> Ordering,
    ) -> Vec<(TeamId, TeamStats)> {
        let mut ranking = self.standings();
        ranking.sort_by(|(_, a), (_, b)| compare(a, b));
        ranking
    }

    pub fn ranking(&self) -> Vec<(TeamId, TeamStats)> {
        self.ranking_by(self.comparator)
    }

    /// Team ids, best first.
    pub fn ranked_ids(&self) -> Vec<TeamId> {
        self.ranking().into_iter().map(|(id, _)| id).collect()
    }

    /// Ranking with full team records.
    pub fn state(&self, roster: &Roster) -> Result<RoundRobinState, TournamentError> {
        let ranking = self
            .ranking()
            .into_iter()
            .map(|(id, stats)| Ok((roster.get(id)?.clone(), stats)))
            .collect::<Result<Vec<_>, TournamentError>>()?;
        Ok(RoundRobinState {
            matches_played: self.book.matches_decided(),
            matches_total: self.book.matches().len(),
            ranking,
        })
    }
}

impl TournamentStage for RoundRobinStage {
    fn book(&self) -> &MatchBook {
        &self.book
    }

    fn book_mut(&mut self) -> &mut MatchBook {
        &mut self.book
    }

    /// First undecided match in schedule order.
    fn get_next(&mut self) -> Result<Option<MatchKey>, TournamentError> {
        Ok(self
            .book
            .matches()
            .iter()
            .find(|m| m.winner.is_none())
            .map(Match::key))
    }
}
