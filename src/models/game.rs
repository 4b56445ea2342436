//! Match, MatchGame, MatchResult and StageKind.

use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index of a match within its round (0-based).
pub type MatchId = usize;

/// Unique identifier for a single played game.
pub type MatchGameId = Uuid;

/// Outcome of one game. `Blue` is the first opponent slot, `Red` the second.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Blue,
    Red,
    Draw,
}

impl MatchResult {
    /// Opponent slot of the winner, `None` for a draw.
    pub fn slot(self) -> Option<usize> {
        match self {
            MatchResult::Blue => Some(0),
            MatchResult::Red => Some(1),
            MatchResult::Draw => None,
        }
    }

    pub fn is_decisive(self) -> bool {
        self != MatchResult::Draw
    }
}

/// Stage a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    RoundRobin,
    Knockout,
    LastChanceFinal,
}

/// Address of a match inside a stage: `(round, match_id)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchKey {
    pub round: usize,
    pub match_id: MatchId,
}

impl MatchKey {
    pub fn new(round: usize, match_id: MatchId) -> Self {
        Self { round, match_id }
    }

    /// The match in the previous round feeding the given opponent slot.
    /// `None` for first-round matches.
    pub fn parent(self, slot: usize) -> Option<MatchKey> {
        let round = self.round.checked_sub(1)?;
        Some(MatchKey::new(round, self.match_id * 2 + slot))
    }
}

/// A scheduled match between two opponent slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: MatchId,
    pub stage: StageKind,
    /// 0-based, increasing toward the final.
    pub round: usize,
    /// `None` until dependency resolution fills the slot.
    pub opponents: [Option<TeamId>; 2],
    /// None if not yet decided.
    pub winner: Option<MatchResult>,
}

impl Match {
    pub fn new(match_id: MatchId, stage: StageKind, round: usize) -> Self {
        Self {
            match_id,
            stage,
            round,
            opponents: [None, None],
            winner: None,
        }
    }

    /// Match with both opponents already known.
    pub fn between(
        match_id: MatchId,
        stage: StageKind,
        round: usize,
        blue: TeamId,
        red: TeamId,
    ) -> Self {
        Self {
            opponents: [Some(blue), Some(red)],
            ..Self::new(match_id, stage, round)
        }
    }

    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.round, self.match_id)
    }

    /// Both opponents, if both slots are resolved.
    pub fn teams(&self) -> Option<(TeamId, TeamId)> {
        match self.opponents {
            [Some(blue), Some(red)] => Some((blue, red)),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.teams().is_some()
    }

    /// Winning team, if the match is decided and was not a draw.
    pub fn winning_team(&self) -> Option<TeamId> {
        let slot = self.winner?.slot()?;
        self.opponents[slot]
    }

    /// Losing team, if the match is decided and was not a draw.
    pub fn losing_team(&self) -> Option<TeamId> {
        let slot = self.winner?.slot()?;
        self.opponents[1 - slot]
    }
}

/// One played instance of a match. Several exist when a knockout match is replayed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchGame {
    pub id: MatchGameId,
    /// The match this game was played for.
    pub parent: MatchKey,
    pub winner: MatchResult,
    /// Opponents as they were seated for this game.
    pub opponents: [TeamId; 2],
    pub played_at: DateTime<Utc>,
    /// Opaque final state returned by the play callback.
    pub final_state: serde_json::Value,
}

impl MatchGame {
    pub fn new(
        parent: MatchKey,
        winner: MatchResult,
        opponents: [TeamId; 2],
        final_state: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent,
            winner,
            opponents,
            played_at: Utc::now(),
            final_state,
        }
    }
}
