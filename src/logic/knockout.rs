//! Knockout stage: single elimination with lazily resolved later rounds.

use crate::logic::bracket::BracketTree;
use crate::logic::seeding::{bracket_rounds, seeded};
use crate::logic::stage::{MatchBook, TournamentStage};
use crate::models::{Match, MatchKey, StageKind, TeamId, TournamentError};

/// Default number of games a drawn knockout match may take.
pub const DEFAULT_NUM_REPLAYS: usize = 3;

/// All knockout matches for a ranked list (best first) of 2, 4, 8 or 16 teams.
///
/// Round `r` has `N / 2^(r+1)` matches. Only round 0 gets opponents here (in seed order);
/// later slots stay empty until their parent matches are decided.
pub fn prepare_knockout_matches(teams: &[TeamId]) -> Result<Vec<Match>, TournamentError> {
    let num_rounds = bracket_rounds(teams.len())? as usize;

    let mut matches = Vec::with_capacity(teams.len() - 1);
    let mut num_matches = teams.len() / 2;
    for round in 0..num_rounds {
        matches.extend((0..num_matches).map(|id| Match::new(id, StageKind::Knockout, round)));
        num_matches /= 2;
    }

    for (idx, team) in seeded(teams)?.into_iter().enumerate() {
        matches[idx / 2].opponents[idx % 2] = Some(team);
    }
    Ok(matches)
}

/// Single-elimination bracket. Drawn games are replayed up to the replay cap.
#[derive(Clone, Debug)]
pub struct KnockoutStage {
    teams: Vec<TeamId>,
    book: MatchBook,
    final_key: MatchKey,
}

impl KnockoutStage {
    pub fn new(teams: Vec<TeamId>) -> Result<Self, TournamentError> {
        let matches = prepare_knockout_matches(&teams)?;
        log::info!(
            "Knockout: {} teams, {} matches",
            teams.len(),
            matches.len()
        );
        Ok(Self::from_matches(StageKind::Knockout, teams, matches))
    }

    /// Stage over a prepared match list; the final is the match in the last round with id 0.
    pub fn from_matches(kind: StageKind, teams: Vec<TeamId>, matches: Vec<Match>) -> Self {
        let final_round = matches.iter().map(|m| m.round).max().unwrap_or(0);
        Self {
            teams,
            book: MatchBook::new(kind, matches, false, DEFAULT_NUM_REPLAYS),
            final_key: MatchKey::new(final_round, 0),
        }
    }

    pub fn with_num_replays(mut self, num_replays: usize) -> Self {
        self.book = self.book.with_num_replays(num_replays);
        self
    }

    /// Participants in ranking order, as given.
    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    pub fn num_rounds(&self) -> usize {
        self.final_key.round + 1
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.book.get(self.final_key)
    }

    /// Done once the final has a winner.
    pub fn is_complete(&self) -> bool {
        self.final_match().is_some_and(|m| m.winner.is_some())
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.final_match().and_then(Match::winning_team)
    }

    pub fn runner_up(&self) -> Option<TeamId> {
        self.final_match().and_then(Match::losing_team)
    }

    /// Bracket tree with the winners decided so far.
    pub fn bracket(&self) -> Result<BracketTree<TeamId>, TournamentError> {
        BracketTree::from_knockout(self.book.matches())
    }

    /// Fill empty opponent slots of `key` from decided parent matches.
    /// Returns whether both slots are now known.
    fn resolve(&mut self, key: MatchKey) -> Result<bool, TournamentError> {
        for slot in 0..2 {
            let filled = self
                .book
                .get(key)
                .ok_or_else(|| TournamentError::unknown(key))?
                .opponents[slot]
                .is_some();
            if filled {
                continue;
            }

            let missing = TournamentError::MissingParentMatch {
                round: key.round,
                match_id: key.match_id,
                slot,
            };
            let parent_key = key.parent(slot).ok_or_else(|| missing.clone())?;
            let parent = self.book.get(parent_key).ok_or(missing)?;
            let Some(team) = parent.winning_team() else {
                continue;
            };

            log::debug!(
                "Match {} (round {}) slot {}: {} advances from match {}",
                key.match_id,
                key.round,
                slot,
                team,
                parent_key.match_id
            );
            if let Some(game) = self.book.get_mut(key) {
                game.opponents[slot] = Some(team);
            }
        }
        Ok(self.book.get(key).is_some_and(Match::is_ready))
    }
}

impl TournamentStage for KnockoutStage {
    fn book(&self) -> &MatchBook {
        &self.book
    }

    fn book_mut(&mut self) -> &mut MatchBook {
        &mut self.book
    }

    /// First undecided match whose opponents are both known, resolving slots on the way.
    /// Matches still waiting for a parent are skipped.
    fn get_next(&mut self) -> Result<Option<MatchKey>, TournamentError> {
        let pending: Vec<MatchKey> = self
            .book
            .matches()
            .iter()
            .filter(|m| m.winner.is_none())
            .map(Match::key)
            .collect();
        for key in pending {
            if self.resolve(key)? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}
