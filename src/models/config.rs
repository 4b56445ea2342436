//! Tournament configuration: stage sizes, replay cap, ranking rule, last-chance policy.

use crate::models::standings::RankingRule;
use serde::{Deserialize, Serialize};

/// Who gets a second chance after the knockout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastChancePolicy {
    /// The knockout winner is the champion.
    #[default]
    Off,
    /// The lowest-ranked round-robin team challenges the knockout winner in a bonus match.
    BonusMatch,
    /// The best `teams` round-robin teams that missed the knockout play their own bracket;
    /// its winner challenges the knockout winner.
    Eliminated { teams: usize },
}

impl LastChancePolicy {
    /// Parses "off", "bonus_match" (or "bonus") and "eliminated:N".
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "off" | "" => Some(LastChancePolicy::Off),
            "bonus" | "bonus_match" => Some(LastChancePolicy::BonusMatch),
            other => {
                let teams = other.strip_prefix("eliminated:")?.parse().ok()?;
                Some(LastChancePolicy::Eliminated { teams })
            }
        }
    }
}

fn default_knockout_teams() -> usize {
    4
}

fn default_num_replays() -> usize {
    3
}

/// Settings for one tournament. Every field falls back to its default when missing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Number of top round-robin teams entering the knockout (2, 4, 8 or 16).
    #[serde(default = "default_knockout_teams")]
    pub knockout_teams: usize,
    /// Maximum games per knockout match while results keep coming out as draws.
    #[serde(default = "default_num_replays")]
    pub num_replays: usize,
    #[serde(default)]
    pub ranking: RankingRule,
    #[serde(default)]
    pub last_chance: LastChancePolicy,
    /// Seed the knockout directly from the given team order.
    #[serde(default)]
    pub skip_round_robin: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            knockout_teams: default_knockout_teams(),
            num_replays: default_num_replays(),
            ranking: RankingRule::default(),
            last_chance: LastChancePolicy::default(),
            skip_round_robin: false,
        }
    }
}

impl TournamentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read overrides from KNOCKOUT_TEAMS, NUM_REPLAYS, RANKING, LAST_CHANCE and
    /// SKIP_ROUND_ROBIN. Missing or unparsable values keep the current setting.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source (the process environment in `from_env`).
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = var("KNOCKOUT_TEAMS").and_then(|v| v.parse().ok()) {
            self.knockout_teams = n;
        }
        match var("NUM_REPLAYS").and_then(|v| v.parse().ok()) {
            Some(0) => log::warn!("Ignoring NUM_REPLAYS=0, a match needs at least one game"),
            Some(n) => self.num_replays = n,
            None => {}
        }
        match var("RANKING").as_deref().map(str::trim) {
            Some("points") => self.ranking = RankingRule::Points,
            Some("points_then_wins") => self.ranking = RankingRule::PointsThenWins,
            Some(other) => log::warn!("Ignoring unknown RANKING value {:?}", other),
            None => {}
        }
        if let Some(raw) = var("LAST_CHANCE") {
            match LastChancePolicy::parse(&raw) {
                Some(policy) => self.last_chance = policy,
                None => log::warn!("Ignoring unknown LAST_CHANCE value {:?}", raw),
            }
        }
        if let Some(flag) = var("SKIP_ROUND_ROBIN").and_then(|v| v.parse().ok()) {
            self.skip_round_robin = flag;
        }
        self
    }
}
