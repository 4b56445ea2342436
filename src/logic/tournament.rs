//! Tournament: drives round robin -> knockout -> optional last chance.

use crate::logic::bracket::BracketTree;
use crate::logic::knockout::KnockoutStage;
use crate::logic::last_chance::{LastChanceStage, SUPPORTED_CHALLENGER_COUNTS};
use crate::logic::render::BracketRenderer;
use crate::logic::round_robin::RoundRobinStage;
use crate::logic::seeding::bracket_rounds;
use crate::logic::stage::{record_counted, PlayMatch, Roster, TournamentStage};
use crate::models::{
    LastChancePolicy, Match, MatchKey, MatchResult, RoundRobinState, Team, TeamId,
    TournamentConfig, TournamentError, TournamentPhase,
};

/// Full tournament state: teams, stages and phase.
#[derive(Clone, Debug)]
pub struct Tournament {
    config: TournamentConfig,
    roster: Roster,
    phase: TournamentPhase,
    /// Round-robin ranking (or the given order when the round robin is skipped), best first.
    ranked: Vec<TeamId>,
    round_robin: Option<RoundRobinStage>,
    knockout: Option<KnockoutStage>,
    last_chance: Option<LastChanceStage>,
}

impl Tournament {
    /// Validate teams and configuration and set up the first stage.
    pub fn new(teams: Vec<Team>, config: TournamentConfig) -> Result<Self, TournamentError> {
        let roster = Roster::new(teams)?;
        bracket_rounds(config.knockout_teams)?;
        let available = roster.len();
        if config.knockout_teams > available {
            return Err(TournamentError::InvalidParticipantCount { count: available });
        }
        let left_over = available - config.knockout_teams;
        match config.last_chance {
            LastChancePolicy::Off => {}
            LastChancePolicy::BonusMatch if left_over == 0 => {
                return Err(TournamentError::InvalidParticipantCount { count: available });
            }
            LastChancePolicy::BonusMatch => {}
            LastChancePolicy::Eliminated { teams } => {
                if !SUPPORTED_CHALLENGER_COUNTS.contains(&teams) || teams > left_over {
                    return Err(TournamentError::InvalidParticipantCount { count: teams });
                }
            }
        }

        let ids = roster.ids();
        let mut tournament = Self {
            config,
            roster,
            phase: TournamentPhase::RoundRobin,
            ranked: ids.clone(),
            round_robin: None,
            knockout: None,
            last_chance: None,
        };
        if tournament.config.skip_round_robin {
            tournament.start_knockout()?;
        } else {
            let stage = RoundRobinStage::new(ids)?
                .with_comparator(tournament.config.ranking.comparator());
            tournament.round_robin = Some(stage);
        }
        Ok(tournament)
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TournamentPhase::Completed
    }

    pub fn teams(&self) -> &[Team] {
        self.roster.teams()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn round_robin(&self) -> Option<&RoundRobinStage> {
        self.round_robin.as_ref()
    }

    pub fn knockout(&self) -> Option<&KnockoutStage> {
        self.knockout.as_ref()
    }

    pub fn last_chance(&self) -> Option<&LastChanceStage> {
        self.last_chance.as_ref()
    }

    /// Stage of the current phase, `None` once completed.
    pub fn current_stage(&self) -> Option<&dyn TournamentStage> {
        match self.phase {
            TournamentPhase::RoundRobin => {
                self.round_robin.as_ref().map(|s| s as &dyn TournamentStage)
            }
            TournamentPhase::Knockout => self.knockout.as_ref().map(|s| s as &dyn TournamentStage),
            TournamentPhase::LastChance => {
                self.last_chance.as_ref().map(|s| s as &dyn TournamentStage)
            }
            TournamentPhase::Completed => None,
        }
    }

    fn current_stage_mut(&mut self) -> Result<&mut dyn TournamentStage, TournamentError> {
        let stage: Option<&mut dyn TournamentStage> = match self.phase {
            TournamentPhase::RoundRobin => {
                self.round_robin.as_mut().map(|s| s as &mut dyn TournamentStage)
            }
            TournamentPhase::Knockout => {
                self.knockout.as_mut().map(|s| s as &mut dyn TournamentStage)
            }
            TournamentPhase::LastChance => {
                self.last_chance.as_mut().map(|s| s as &mut dyn TournamentStage)
            }
            TournamentPhase::Completed => None,
        };
        stage.ok_or(TournamentError::InvalidState)
    }

    /// Round-robin standings, `None` if the round robin was skipped.
    pub fn standings(&self) -> Result<Option<RoundRobinState>, TournamentError> {
        self.round_robin
            .as_ref()
            .map(|stage| stage.state(&self.roster))
            .transpose()
    }

    /// Next playable match of the current stage, moving on to the next stage when the
    /// current one is finished. `None` once the tournament is complete.
    pub fn next_match(&mut self) -> Result<Option<&Match>, TournamentError> {
        loop {
            if self.is_complete() {
                return Ok(None);
            }
            let stage = self.current_stage_mut()?;
            if let Some(key) = stage.get_next()? {
                let stage = self.current_stage_mut()?;
                return Ok(stage.book().get(key));
            }
            self.finish_stage()?;
        }
    }

    /// Record a result for a match of the current stage (for callers playing matches
    /// themselves). Both teams get the game counted once it is stored.
    pub fn record_result(
        &mut self,
        key: MatchKey,
        result: MatchResult,
        state: serde_json::Value,
    ) -> Result<(), TournamentError> {
        let (stage, roster) = self.stage_and_roster()?;
        let stage = stage.ok_or(TournamentError::InvalidState)?;
        record_counted(&mut *stage, roster, key, result, state)?;
        if !stage.has_next() {
            self.finish_stage()?;
        }
        Ok(())
    }

    /// Play one match through `player`. Returns its key, `None` once complete.
    pub fn play_next(
        &mut self,
        player: &mut dyn PlayMatch,
    ) -> Result<Option<MatchKey>, TournamentError> {
        loop {
            let (Some(stage), roster) = self.stage_and_roster()? else {
                return Ok(None);
            };
            if let Some(key) = stage.play_next(roster, player)? {
                return Ok(Some(key));
            }
            self.finish_stage()?;
        }
    }

    /// Current stage, `None` once completed, together with the roster.
    fn stage_and_roster(
        &mut self,
    ) -> Result<(Option<&mut dyn TournamentStage>, &mut Roster), TournamentError> {
        let stage: Option<&mut dyn TournamentStage> = match self.phase {
            TournamentPhase::RoundRobin => Some(
                self.round_robin.as_mut().ok_or(TournamentError::InvalidState)?
                    as &mut dyn TournamentStage,
            ),
            TournamentPhase::Knockout => Some(
                self.knockout.as_mut().ok_or(TournamentError::InvalidState)?
                    as &mut dyn TournamentStage,
            ),
            TournamentPhase::LastChance => Some(
                self.last_chance.as_mut().ok_or(TournamentError::InvalidState)?
                    as &mut dyn TournamentStage,
            ),
            TournamentPhase::Completed => None,
        };
        Ok((stage, &mut self.roster))
    }

    /// Play every remaining match and return the champion.
    pub fn run(&mut self, player: &mut dyn PlayMatch) -> Result<TeamId, TournamentError> {
        while self.play_next(player)?.is_some() {}
        self.champion().ok_or(TournamentError::InvalidState)
    }

    /// Overall winner once the tournament is complete.
    pub fn champion(&self) -> Option<TeamId> {
        if !self.is_complete() {
            return None;
        }
        match &self.last_chance {
            Some(stage) => stage.champion(),
            None => self.knockout.as_ref().and_then(KnockoutStage::champion),
        }
    }

    /// Bracket as far as known: a preview from the current ranking during the round robin,
    /// then the knockout, joined with the last-chance bracket when there is one.
    pub fn bracket(&self) -> Result<BracketTree<TeamId>, TournamentError> {
        let Some(knockout) = &self.knockout else {
            let ranked = match &self.round_robin {
                Some(stage) => stage.ranked_ids(),
                None => self.ranked.clone(),
            };
            return BracketTree::knockout(&ranked[..self.config.knockout_teams]);
        };
        let tree = knockout.bracket()?;
        match &self.last_chance {
            Some(stage) => {
                tree.with_last_chance_final(stage.challenger_bracket()?, stage.champion())
            }
            None => Ok(tree),
        }
    }

    /// Bracket text with team names.
    pub fn render_bracket(&self, renderer: &BracketRenderer) -> Result<String, TournamentError> {
        let names = self.bracket()?.map(&|id: &TeamId| self.roster.name(*id));
        Ok(renderer.render(&names))
    }

    /// Leave the current (finished) stage and set up the next one.
    fn finish_stage(&mut self) -> Result<(), TournamentError> {
        if self.current_stage_mut()?.has_next() {
            // Undecided matches remain but none is playable.
            return Err(TournamentError::InvalidState);
        }
        match self.phase {
            TournamentPhase::RoundRobin => {
                if let Some(stage) = &self.round_robin {
                    let state = stage.state(&self.roster)?;
                    log::info!("Round robin finished. {}", state.summary_line());
                    for (team, stats) in &state.ranking {
                        let label = format!("{} ({})", team.name, team.matches_played);
                        log::info!("  {:>25} {:?}", label, stats);
                    }
                    self.ranked = stage.ranked_ids();
                }
                self.start_knockout()
            }
            TournamentPhase::Knockout => {
                let champion = self
                    .knockout
                    .as_ref()
                    .and_then(KnockoutStage::champion)
                    .ok_or(TournamentError::InvalidState)?;
                log::info!("Knockout won by {}", self.roster.name(champion));
                self.start_last_chance(champion)
            }
            TournamentPhase::LastChance => {
                self.phase = TournamentPhase::Completed;
                if let Some(champion) = self.champion() {
                    log::info!("Tournament won by {}", self.roster.name(champion));
                }
                Ok(())
            }
            TournamentPhase::Completed => Ok(()),
        }
    }

    fn start_knockout(&mut self) -> Result<(), TournamentError> {
        let qualified = self.ranked[..self.config.knockout_teams].to_vec();
        let stage = KnockoutStage::new(qualified)?.with_num_replays(self.config.num_replays);
        self.knockout = Some(stage);
        self.phase = TournamentPhase::Knockout;
        Ok(())
    }

    fn start_last_chance(&mut self, champion: TeamId) -> Result<(), TournamentError> {
        let left_over = &self.ranked[self.config.knockout_teams..];
        let challengers: Vec<TeamId> = match self.config.last_chance {
            LastChancePolicy::Off => {
                self.phase = TournamentPhase::Completed;
                log::info!("Tournament won by {}", self.roster.name(champion));
                return Ok(());
            }
            LastChancePolicy::BonusMatch => left_over.last().copied().into_iter().collect(),
            LastChancePolicy::Eliminated { teams } => {
                left_over.iter().take(teams).copied().collect()
            }
        };
        let stage = LastChanceStage::new(champion, challengers)?
            .with_num_replays(self.config.num_replays);
        self.last_chance = Some(stage);
        self.phase = TournamentPhase::LastChance;
        Ok(())
    }
}
