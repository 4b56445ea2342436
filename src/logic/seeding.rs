//! Seeding: bracket placement order and strong-vs-weak pairing of ranked lists.

use crate::models::TournamentError;
use serde::{Deserialize, Serialize};

/// Bracket sizes the knockout supports.
pub const SUPPORTED_BRACKET_SIZES: [usize; 4] = [2, 4, 8, 16];

/// Standard seeding permutation for `2^m` participants.
///
/// Seed 0 is the strongest team. If the lower seed always wins, the strongest remaining team
/// meets the weakest remaining team in every round, not just the first:
///
/// ```text
/// m=0  [0]
/// m=1  [0, 1]
/// m=2  [0, 3, 1, 2]
/// m=3  [0, 7, 3, 4, 1, 6, 2, 5]
/// ```
///
/// # Panics
///
/// If `2^m` does not fit in a `usize`, i.e. `m >= usize::BITS`.
pub fn seed_order(m: u32) -> Vec<usize> {
    assert!(m < usize::BITS, "seed order for 2^{} participants", m);
    if m == 0 {
        return vec![0];
    }
    let n = 1usize << m;
    seed_order(m - 1)
        .into_iter()
        .flat_map(|i| [i, n - i - 1])
        .collect()
}

/// `log2(count)` if `count` is a supported bracket size.
pub fn bracket_rounds(count: usize) -> Result<u32, TournamentError> {
    if count == 0 {
        return Err(TournamentError::EmptyTeamList);
    }
    if !SUPPORTED_BRACKET_SIZES.contains(&count) {
        return Err(TournamentError::InvalidParticipantCount { count });
    }
    Ok(count.trailing_zeros())
}

/// Reorder a ranked list (best first) into bracket placement order.
pub fn seeded<T: Clone>(ranked: &[T]) -> Result<Vec<T>, TournamentError> {
    let rounds = bracket_rounds(ranked.len())?;
    Ok(seed_order(rounds)
        .into_iter()
        .map(|idx| ranked[idx].clone())
        .collect())
}

/// A ranked list split into strong-vs-weak pairs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankPairing<T> {
    /// Rank 1 with the lowest rank, rank 2 with the second lowest, ...
    pub pairs: Vec<(T, T)>,
    /// Lowest-ranked team of an odd-sized list. It has no opponent in this pairing and
    /// advances on a bye.
    pub remainder: Option<T>,
    /// Worst team overall, held back for a final bonus match.
    pub bonus: Option<T>,
}

impl<T> RankPairing<T> {
    /// Flat order: pairs first, then the remainder, then the bonus team.
    pub fn into_order(self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.pairs.len() * 2 + 2);
        for (strong, weak) in self.pairs {
            order.push(strong);
            order.push(weak);
        }
        order.extend(self.remainder);
        order.extend(self.bonus);
        order
    }
}

/// Pair the best team with the worst, the second best with the second worst, etc.
///
/// With `bonus_match` the worst team is held back first; an odd count after that leaves the
/// lowest remaining team as remainder.
pub fn sort_ranks<T>(mut teams: Vec<T>, bonus_match: bool) -> RankPairing<T> {
    if teams.len() < 2 {
        return RankPairing {
            pairs: Vec::new(),
            remainder: teams.pop(),
            bonus: None,
        };
    }

    let bonus = if bonus_match { teams.pop() } else { None };
    let remainder = if teams.len() % 2 != 0 {
        teams.pop()
    } else {
        None
    };

    let half = teams.len() / 2;
    let weak: Vec<T> = teams.drain(half..).rev().collect();
    let pairs = teams.into_iter().zip(weak).collect();

    RankPairing {
        pairs,
        remainder,
        bonus,
    }
}
