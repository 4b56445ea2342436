//! TournamentError and TournamentPhase.

use crate::models::game::{MatchId, MatchKey};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Knockout brackets support exactly 2, 4, 8 or 16 participants.
    InvalidParticipantCount { count: usize },
    /// No teams were given.
    EmptyTeamList,
    /// Both children of every bracket node must have equal depth.
    UnbalancedBracket,
    /// The predecessor match feeding an opponent slot does not exist.
    MissingParentMatch {
        round: usize,
        match_id: MatchId,
        slot: usize,
    },
    /// A knockout match kept ending in a draw past the replay cap.
    ReplayLimitExceeded {
        round: usize,
        match_id: MatchId,
        limit: usize,
    },
    /// The match already has its result.
    DuplicateResult { round: usize, match_id: MatchId },
    /// No match with this key in the stage.
    UnknownMatch { round: usize, match_id: MatchId },
    /// An opponent slot of the match is still unresolved.
    MatchNotReady { round: usize, match_id: MatchId },
    /// Two teams share the same id.
    DuplicateTeamId(TeamId),
    /// Team id not found in the roster.
    UnknownTeam(TeamId),
    /// Tournament is not in a phase that allows this action.
    InvalidState,
}

impl TournamentError {
    pub(crate) fn duplicate(key: MatchKey) -> Self {
        TournamentError::DuplicateResult {
            round: key.round,
            match_id: key.match_id,
        }
    }

    pub(crate) fn unknown(key: MatchKey) -> Self {
        TournamentError::UnknownMatch {
            round: key.round,
            match_id: key.match_id,
        }
    }

    pub(crate) fn not_ready(key: MatchKey) -> Self {
        TournamentError::MatchNotReady {
            round: key.round,
            match_id: key.match_id,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidParticipantCount { count } => write!(
                f,
                "Only knockout brackets with 2, 4, 8 or 16 participants are supported (got {})",
                count
            ),
            TournamentError::EmptyTeamList => write!(f, "No teams given"),
            TournamentError::UnbalancedBracket => write!(f, "Bracket tree is not balanced"),
            TournamentError::MissingParentMatch {
                round,
                match_id,
                slot,
            } => write!(
                f,
                "Match {} in round {} has no parent match for slot {}",
                match_id, round, slot
            ),
            TournamentError::ReplayLimitExceeded {
                round,
                match_id,
                limit,
            } => write!(
                f,
                "Match {} in round {} is still undecided after {} games",
                match_id, round, limit
            ),
            TournamentError::DuplicateResult { round, match_id } => {
                write!(f, "Match {} in round {} already has a result", match_id, round)
            }
            TournamentError::UnknownMatch { round, match_id } => {
                write!(f, "No match {} in round {}", match_id, round)
            }
            TournamentError::MatchNotReady { round, match_id } => write!(
                f,
                "Match {} in round {} is waiting for its opponents",
                match_id, round
            ),
            TournamentError::DuplicateTeamId(id) => write!(f, "Team id {} is used twice", id),
            TournamentError::UnknownTeam(id) => write!(f, "Team {} not found", id),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    /// Every team plays every other team once.
    #[default]
    RoundRobin,
    /// Single elimination among the best round-robin teams.
    Knockout,
    /// Optional consolation bracket; its winner challenges the knockout champion.
    LastChance,
    /// Champion decided.
    Completed,
}
