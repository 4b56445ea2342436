//! Behavior shared by all stages: match storage, result recording, replay policy.

use crate::models::{
    Match, MatchGame, MatchKey, MatchResult, StageKind, Team, TeamId, TournamentError,
};
use std::collections::{HashMap, HashSet};

/// External collaborator deciding matches. Receives the match and both seated teams and
/// returns the result plus an opaque final-state payload.
pub trait PlayMatch {
    fn play(&mut self, game: &Match, blue: &Team, red: &Team) -> (MatchResult, serde_json::Value);
}

impl<F> PlayMatch for F
where
    F: FnMut(&Match, &Team, &Team) -> (MatchResult, serde_json::Value),
{
    fn play(&mut self, game: &Match, blue: &Team, red: &Team) -> (MatchResult, serde_json::Value) {
        self(game, blue, red)
    }
}

/// The teams of a tournament, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    /// Fails on an empty list or a repeated id.
    pub fn new(teams: Vec<Team>) -> Result<Self, TournamentError> {
        if teams.is_empty() {
            return Err(TournamentError::EmptyTeamList);
        }
        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.id) {
                return Err(TournamentError::DuplicateTeamId(team.id));
            }
        }
        Ok(Self { teams })
    }

    /// Teams named "#0", "#1", ... with ids 0..count.
    pub fn numbered(count: usize) -> Result<Self, TournamentError> {
        Roster::new(
            (0..count as u32)
                .map(|id| Team::new(id, format!("#{}", id)))
                .collect(),
        )
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or(TournamentError::UnknownTeam(id))
    }

    pub fn get_mut(&mut self, id: TeamId) -> Result<&mut Team, TournamentError> {
        self.teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TournamentError::UnknownTeam(id))
    }

    /// Display name, or the id itself for unknown teams.
    pub fn name(&self, id: TeamId) -> String {
        self.get(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }
}

fn at_least_one_game(num_replays: usize) -> usize {
    if num_replays == 0 {
        log::warn!("num_replays is 0, allowing one game per match");
        return 1;
    }
    num_replays
}

/// Matches of one stage, indexed by `(round, match_id)`, plus every game played for them.
#[derive(Clone, Debug)]
pub struct MatchBook {
    kind: StageKind,
    matches: Vec<Match>,
    index: HashMap<MatchKey, usize>,
    games: Vec<MatchGame>,
    draw_allowed: bool,
    num_replays: usize,
}

impl MatchBook {
    /// `draw_allowed` stages accept exactly one game per match, draws included.
    /// Other stages keep replaying drawn matches, at most `num_replays` games each.
    pub fn new(
        kind: StageKind,
        matches: Vec<Match>,
        draw_allowed: bool,
        num_replays: usize,
    ) -> Self {
        let index = matches
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.key(), idx))
            .collect();
        Self {
            kind,
            matches,
            index,
            games: Vec::new(),
            draw_allowed,
            num_replays: at_least_one_game(num_replays),
        }
    }

    pub fn with_num_replays(mut self, num_replays: usize) -> Self {
        self.num_replays = at_least_one_game(num_replays);
        self
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn draw_allowed(&self) -> bool {
        self.draw_allowed
    }

    pub fn num_replays(&self) -> usize {
        self.num_replays
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get(&self, key: MatchKey) -> Option<&Match> {
        self.index.get(&key).map(|&idx| &self.matches[idx])
    }

    pub(crate) fn get_mut(&mut self, key: MatchKey) -> Option<&mut Match> {
        let idx = *self.index.get(&key)?;
        self.matches.get_mut(idx)
    }

    pub fn games(&self) -> &[MatchGame] {
        &self.games
    }

    pub fn games_for(&self, key: MatchKey) -> impl Iterator<Item = &MatchGame> + '_ {
        self.games.iter().filter(move |g| g.parent == key)
    }

    /// True while any match is undecided.
    pub fn has_next(&self) -> bool {
        self.matches.iter().any(|m| m.winner.is_none())
    }

    pub fn matches_decided(&self) -> usize {
        self.matches.iter().filter(|m| m.winner.is_some()).count()
    }

    /// Seated teams of `key` if it can take another game. Fails for an unknown, decided or
    /// unseated match, and once a match has used up its games.
    pub fn check_playable(&self, key: MatchKey) -> Result<(TeamId, TeamId), TournamentError> {
        let game = self.get(key).ok_or_else(|| TournamentError::unknown(key))?;
        if game.winner.is_some() {
            return Err(TournamentError::duplicate(key));
        }
        let teams = game.teams().ok_or_else(|| TournamentError::not_ready(key))?;
        let played = self.games_for(key).count();
        if self.draw_allowed && played > 0 {
            return Err(TournamentError::duplicate(key));
        }
        if !self.draw_allowed && played >= self.num_replays {
            return Err(self.limit_exceeded(key));
        }
        Ok(teams)
    }

    fn limit_exceeded(&self, key: MatchKey) -> TournamentError {
        TournamentError::ReplayLimitExceeded {
            round: key.round,
            match_id: key.match_id,
            limit: self.num_replays,
        }
    }

    /// Store one game for `key` and commit the match winner when the game decides it.
    pub fn record_result(
        &mut self,
        key: MatchKey,
        result: MatchResult,
        state: serde_json::Value,
    ) -> Result<&Match, TournamentError> {
        let (blue, red) = self.check_playable(key)?;
        let idx = *self
            .index
            .get(&key)
            .ok_or_else(|| TournamentError::unknown(key))?;
        let played = self.games_for(key).count();

        self.games
            .push(MatchGame::new(key, result, [blue, red], state));
        log::debug!(
            "{:?} match {} (round {}): {} vs {} -> {:?}",
            self.kind,
            key.match_id,
            key.round,
            blue,
            red,
            result
        );

        if self.draw_allowed || result.is_decisive() {
            self.matches[idx].winner = Some(result);
        } else if played + 1 >= self.num_replays {
            return Err(self.limit_exceeded(key));
        } else {
            log::warn!(
                "Match {} (round {}) drawn, replay {} of {}",
                key.match_id,
                key.round,
                played + 2,
                self.num_replays
            );
        }
        Ok(&self.matches[idx])
    }
}

/// A stage of the tournament: hands out playable matches and records their results.
pub trait TournamentStage {
    fn book(&self) -> &MatchBook;

    fn book_mut(&mut self) -> &mut MatchBook;

    /// Next match that can be played now, `None` when nothing is playable.
    fn get_next(&mut self) -> Result<Option<MatchKey>, TournamentError>;

    fn has_next(&self) -> bool {
        self.book().has_next()
    }

    fn matches(&self) -> &[Match] {
        self.book().matches()
    }

    fn record_result(
        &mut self,
        key: MatchKey,
        result: MatchResult,
        state: serde_json::Value,
    ) -> Result<&Match, TournamentError> {
        self.book_mut().record_result(key, result, state)
    }

    /// Play the next match through `player`, record it and count it for both teams.
    /// Returns the key of the played match, `None` if nothing was playable. A match that
    /// cannot take another game fails before `player` is called.
    fn play_next(
        &mut self,
        roster: &mut Roster,
        player: &mut dyn PlayMatch,
    ) -> Result<Option<MatchKey>, TournamentError> {
        let Some(key) = self.get_next()? else {
            return Ok(None);
        };
        let (blue, red) = self.book().check_playable(key)?;
        let game = self
            .book()
            .get(key)
            .cloned()
            .ok_or_else(|| TournamentError::unknown(key))?;
        let (result, state) = player.play(&game, roster.get(blue)?, roster.get(red)?);

        let recorded = record_counted(self, roster, key, result, state);
        match result.slot() {
            Some(slot) => log::info!("Winner: {}", roster.name([blue, red][slot])),
            None => log::info!("Draw: {} vs {}", roster.name(blue), roster.name(red)),
        }
        recorded?;
        Ok(Some(key))
    }
}

/// Record a result and count the game for both teams if it was stored.
pub(crate) fn record_counted<S: TournamentStage + ?Sized>(
    stage: &mut S,
    roster: &mut Roster,
    key: MatchKey,
    result: MatchResult,
    state: serde_json::Value,
) -> Result<(), TournamentError> {
    let (blue, red) = stage.book().check_playable(key)?;
    let before = stage.book().games().len();
    let recorded = stage.record_result(key, result, state).map(|_| ());
    if stage.book().games().len() > before {
        for id in [blue, red] {
            roster.get_mut(id)?.record_played();
        }
    }
    recorded
}
