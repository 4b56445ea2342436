//! Knockout bracket skeleton as a balanced recursive tree.

use crate::logic::seeding::{seeded, sort_ranks};
use crate::models::{Match, MatchKey, TeamId, TournamentError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A knockout bracket. Every `MatchNode` has children of equal depth.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketTree<T> {
    TeamLeaf(T),
    /// The subtree advances without playing a match.
    Bye(Box<BracketTree<T>>),
    MatchNode {
        left: Box<BracketTree<T>>,
        /// Winner of the match, `None` while unplayed.
        winner: Option<T>,
        right: Box<BracketTree<T>>,
    },
}

impl<T> BracketTree<T> {
    /// Join two subtrees in a match. Fails if their depths differ.
    pub fn match_node(
        left: BracketTree<T>,
        winner: Option<T>,
        right: BracketTree<T>,
    ) -> Result<Self, TournamentError> {
        if left.depth() != right.depth() {
            return Err(TournamentError::UnbalancedBracket);
        }
        Ok(BracketTree::MatchNode {
            left: Box::new(left),
            winner,
            right: Box::new(right),
        })
    }

    pub fn bye(inner: BracketTree<T>) -> Self {
        BracketTree::Bye(Box::new(inner))
    }

    /// Number of levels; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            BracketTree::TeamLeaf(_) => 1,
            BracketTree::Bye(inner) => 1 + inner.depth(),
            BracketTree::MatchNode { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn is_balanced(&self) -> bool {
        match self {
            BracketTree::TeamLeaf(_) => true,
            BracketTree::Bye(inner) => inner.is_balanced(),
            BracketTree::MatchNode { left, right, .. } => {
                left.depth() == right.depth() && left.is_balanced() && right.is_balanced()
            }
        }
    }

    /// Wrap in byes until the tree reaches `depth`.
    pub fn pad_to_depth(self, depth: usize) -> Self {
        let mut tree = self;
        while tree.depth() < depth {
            tree = BracketTree::bye(tree);
        }
        tree
    }

    /// Pair consecutive subtrees level by level until one root remains.
    /// A trailing unpaired subtree advances on a bye.
    pub fn pair_up(mut level: Vec<BracketTree<T>>) -> Result<Self, TournamentError> {
        if level.is_empty() {
            return Err(TournamentError::EmptyTeamList);
        }
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut nodes = level.into_iter();
            while let Some(first) = nodes.next() {
                match nodes.next() {
                    Some(second) => next.push(BracketTree::match_node(first, None, second)?),
                    None => next.push(BracketTree::bye(first)),
                }
            }
            level = next;
        }
        level.pop().ok_or(TournamentError::EmptyTeamList)
    }

    /// Bracket for teams already in placement order (2, 4, 8 or 16 of them).
    pub fn from_seeded(teams: Vec<T>) -> Result<Self, TournamentError> {
        crate::logic::seeding::bracket_rounds(teams.len())?;
        BracketTree::pair_up(teams.into_iter().map(BracketTree::TeamLeaf).collect())
    }

    /// Add a final between this tree and a challenger tree, padding the shallower side with
    /// byes so the result stays balanced.
    pub fn with_last_chance_final(
        self,
        challenger: BracketTree<T>,
        winner: Option<T>,
    ) -> Result<Self, TournamentError> {
        let depth = self.depth().max(challenger.depth());
        BracketTree::match_node(self.pad_to_depth(depth), winner, challenger.pad_to_depth(depth))
    }

    /// Visit every node depth-first (node before children, left before right).
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a BracketTree<T>, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a BracketTree<T>, usize)) {
        visit(self, depth);
        match self {
            BracketTree::TeamLeaf(_) => {}
            BracketTree::Bye(inner) => inner.walk_at(depth + 1, visit),
            BracketTree::MatchNode { left, right, .. } => {
                left.walk_at(depth + 1, visit);
                right.walk_at(depth + 1, visit);
            }
        }
    }

    /// Teams at the leaves, top to bottom.
    pub fn teams(&self) -> Vec<&T> {
        let mut teams = Vec::new();
        self.walk(&mut |node, _| {
            if let BracketTree::TeamLeaf(team) = node {
                teams.push(team);
            }
        });
        teams
    }

    /// Winner of the root match, if decided.
    pub fn champion(&self) -> Option<&T> {
        match self {
            BracketTree::TeamLeaf(team) => Some(team),
            BracketTree::Bye(inner) => inner.champion(),
            BracketTree::MatchNode { winner, .. } => winner.as_ref(),
        }
    }

    /// Same shape with every team mapped, e.g. ids to display names.
    pub fn map<U>(&self, f: &impl Fn(&T) -> U) -> BracketTree<U> {
        match self {
            BracketTree::TeamLeaf(team) => BracketTree::TeamLeaf(f(team)),
            BracketTree::Bye(inner) => BracketTree::bye(inner.map(f)),
            BracketTree::MatchNode {
                left,
                winner,
                right,
            } => BracketTree::MatchNode {
                left: Box::new(left.map(f)),
                winner: winner.as_ref().map(f),
                right: Box::new(right.map(f)),
            },
        }
    }

    /// Preview bracket for any ranked list: strongest meets weakest, an odd team out gets a
    /// bye, and with `bonus_match` the worst team waits for a final against the bracket winner.
    pub fn prepare_matches(ranked: Vec<T>, bonus_match: bool) -> Result<Self, TournamentError> {
        if ranked.is_empty() {
            return Err(TournamentError::EmptyTeamList);
        }
        let mut pairing = sort_ranks(ranked, bonus_match);
        let bonus = pairing.bonus.take();
        let order = pairing.into_order();
        if order.is_empty() {
            return bonus
                .map(BracketTree::TeamLeaf)
                .ok_or(TournamentError::EmptyTeamList);
        }

        let tree = BracketTree::pair_up(order.into_iter().map(BracketTree::TeamLeaf).collect())?;
        let tree = match bonus {
            Some(team) => tree.with_last_chance_final(BracketTree::TeamLeaf(team), None)?,
            None => tree,
        };
        if !tree.is_balanced() {
            return Err(TournamentError::UnbalancedBracket);
        }
        Ok(tree)
    }
}

impl<T: Clone> BracketTree<T> {
    /// Knockout bracket for a ranked list (best first): seeds it, then pairs it up.
    pub fn knockout(ranked: &[T]) -> Result<Self, TournamentError> {
        BracketTree::from_seeded(seeded(ranked)?)
    }
}

impl BracketTree<TeamId> {
    /// Rebuild the bracket from a knockout match list. Leaves follow the round-0 opponent
    /// order; node labels are the winners decided so far.
    pub fn from_knockout(matches: &[Match]) -> Result<Self, TournamentError> {
        let by_key: HashMap<MatchKey, &Match> = matches.iter().map(|m| (m.key(), m)).collect();
        let final_round = matches
            .iter()
            .map(|m| m.round)
            .max()
            .ok_or(TournamentError::EmptyTeamList)?;
        build_subtree(&by_key, MatchKey::new(final_round, 0))
    }

    /// Bracket below (and including) the match at `root`.
    pub fn from_matches_at(matches: &[Match], root: MatchKey) -> Result<Self, TournamentError> {
        let by_key: HashMap<MatchKey, &Match> = matches.iter().map(|m| (m.key(), m)).collect();
        build_subtree(&by_key, root)
    }
}

fn build_subtree(
    by_key: &HashMap<MatchKey, &Match>,
    key: MatchKey,
) -> Result<BracketTree<TeamId>, TournamentError> {
    let game = by_key
        .get(&key)
        .ok_or_else(|| TournamentError::unknown(key))?;
    let mut sides = Vec::with_capacity(2);
    for slot in 0..2 {
        let side = match key.parent(slot) {
            None => {
                let team = game.opponents[slot].ok_or_else(|| TournamentError::not_ready(key))?;
                BracketTree::TeamLeaf(team)
            }
            Some(parent) => {
                if !by_key.contains_key(&parent) {
                    return Err(TournamentError::MissingParentMatch {
                        round: key.round,
                        match_id: key.match_id,
                        slot,
                    });
                }
                build_subtree(by_key, parent)?
            }
        };
        sides.push(side);
    }
    let right = sides.pop().ok_or(TournamentError::UnbalancedBracket)?;
    let left = sides.pop().ok_or(TournamentError::UnbalancedBracket)?;
    BracketTree::match_node(left, game.winning_team(), right)
}
