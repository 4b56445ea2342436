//! Last-chance stage: teams that dropped out earlier play for the right to challenge the
//! knockout champion.
//!
//! The challenger bracket is laid out as the lower half of a knockout twice its size, with
//! the champion sitting in the upper half's final slot. Parent lookup therefore works exactly
//! as in the knockout: challenger match `(r, id)` feeds `(r + 1, id / 2)`, and the
//! challengers' final `(k - 1, 1)` feeds slot 1 of the last-chance final `(k, 0)`.

use crate::logic::bracket::BracketTree;
use crate::logic::knockout::KnockoutStage;
use crate::logic::seeding::seeded;
use crate::logic::stage::{MatchBook, TournamentStage};
use crate::models::{Match, MatchKey, StageKind, TeamId, TournamentError};

/// Challenger counts the last-chance bracket supports.
pub const SUPPORTED_CHALLENGER_COUNTS: [usize; 4] = [1, 2, 4, 8];

/// Matches of the last-chance stage for `champion` and ranked `challengers` (best first).
pub fn prepare_last_chance_matches(
    champion: TeamId,
    challengers: &[TeamId],
) -> Result<Vec<Match>, TournamentError> {
    let count = challengers.len();
    if count == 0 {
        return Err(TournamentError::EmptyTeamList);
    }
    if !SUPPORTED_CHALLENGER_COUNTS.contains(&count) {
        return Err(TournamentError::InvalidParticipantCount { count });
    }

    let kind = StageKind::LastChanceFinal;
    if count == 1 {
        return Ok(vec![Match::between(0, kind, 0, champion, challengers[0])]);
    }

    let rounds = count.trailing_zeros() as usize;
    let mut matches = Vec::with_capacity(count);
    for round in 0..rounds {
        let num_matches = count >> (round + 1);
        matches.extend((num_matches..2 * num_matches).map(|id| Match::new(id, kind, round)));
    }
    for (idx, team) in seeded(challengers)?.into_iter().enumerate() {
        matches[idx / 2].opponents[idx % 2] = Some(team);
    }

    let mut last = Match::new(0, kind, rounds);
    last.opponents[0] = Some(champion);
    matches.push(last);
    Ok(matches)
}

/// Consolation bracket whose winner meets the champion in a final.
#[derive(Clone, Debug)]
pub struct LastChanceStage {
    champion: TeamId,
    inner: KnockoutStage,
}

impl LastChanceStage {
    pub fn new(champion: TeamId, challengers: Vec<TeamId>) -> Result<Self, TournamentError> {
        let matches = prepare_last_chance_matches(champion, &challengers)?;
        log::info!(
            "Last chance: {} challenger(s) for champion {}",
            challengers.len(),
            champion
        );
        Ok(Self {
            champion,
            inner: KnockoutStage::from_matches(StageKind::LastChanceFinal, challengers, matches),
        })
    }

    pub fn with_num_replays(mut self, num_replays: usize) -> Self {
        self.inner = self.inner.with_num_replays(num_replays);
        self
    }

    /// The knockout champion defending the title.
    pub fn defending_champion(&self) -> TeamId {
        self.champion
    }

    pub fn challengers(&self) -> &[TeamId] {
        self.inner.teams()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// Winner of the last-chance final.
    pub fn champion(&self) -> Option<TeamId> {
        self.inner.champion()
    }

    /// Champion on the upper side, the challenger bracket on the lower side.
    pub fn bracket(&self) -> Result<BracketTree<TeamId>, TournamentError> {
        let last = self
            .inner
            .final_match()
            .ok_or(TournamentError::EmptyTeamList)?;
        let challenger = self.challenger_bracket()?;
        let champion = BracketTree::TeamLeaf(self.champion).pad_to_depth(challenger.depth());
        BracketTree::match_node(champion, last.winning_team(), challenger)
    }

    /// Bracket of the challengers alone, rooted at their final (or the single challenger).
    pub fn challenger_bracket(&self) -> Result<BracketTree<TeamId>, TournamentError> {
        let last = self
            .inner
            .final_match()
            .ok_or(TournamentError::EmptyTeamList)?;
        match last.key().parent(1) {
            Some(root) => BracketTree::from_matches_at(self.inner.matches(), root),
            None => last.opponents[1]
                .map(BracketTree::TeamLeaf)
                .ok_or_else(|| TournamentError::not_ready(last.key())),
        }
    }
}

impl TournamentStage for LastChanceStage {
    fn book(&self) -> &MatchBook {
        self.inner.book()
    }

    fn book_mut(&mut self) -> &mut MatchBook {
        self.inner.book_mut()
    }

    fn get_next(&mut self) -> Result<Option<MatchKey>, TournamentError> {
        self.inner.get_next()
    }
}
