//! Team data structure.

use serde::{Deserialize, Serialize};

/// Unique identifier for a team (stable for the whole tournament).
pub type TeamId = u32;

/// A team taking part in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Games played so far across all stages (replays included).
    #[serde(default)]
    pub matches_played: u32,
}

impl Team {
    /// Create a new team with the given id and name.
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            matches_played: 0,
        }
    }

    /// Record that this team took part in one game.
    pub fn record_played(&mut self) {
        self.matches_played += 1;
    }
}
