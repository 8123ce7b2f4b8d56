//! # Game loop
//!
//! Half-innings of plate appearances until the game is decided.
//!
//! - bases are cleared only when a half-inning starts
//! - a half ends at three outs, or at once on a walk-off
//! - the bottom of the ninth (or later) is skipped when the home team leads
//! - extra innings continue until one team leads after a full inning

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::at_bat::{AtBatDriver, Situation};
use super::bases::BaseState;
use super::config::SimConfig;
use super::play::PlayResult;
use super::resolvers::ResolverRegistry;
use super::rng::GameRng;
use crate::error::{Result, SimError};
use crate::models::{LeagueContext, ParkFactors, Player};

pub const REGULATION_INNINGS: u32 = 9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub abbrev: String,
    pub name: String,
    pub lineup: Vec<Player>,
    pub pitcher: Player,
    pub park: ParkFactors,
}

impl Team {
    pub fn new(abbrev: &str, name: &str, lineup: Vec<Player>, pitcher: Player, park: ParkFactors) -> Self {
        Self {
            abbrev: abbrev.to_string(),
            name: name.to_string(),
            lineup,
            pitcher,
            park,
        }
    }

    /// Every batter needs batting rates, the pitcher pitching rates.
    pub fn validate(&self) -> Result<()> {
        if self.lineup.is_empty() {
            return Err(SimError::InvalidLineup {
                team: self.abbrev.clone(),
                reason: "no batters".to_string(),
            });
        }
        for p in &self.lineup {
            p.validate_batting()?;
        }
        self.pitcher.validate_pitching()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
    Top,
    Bottom,
}

/// Runs, hits and errors for one team, plus runs by inning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLine {
    pub runs: u32,
    pub hits: u32,
    pub errors: u32,
    pub by_inning: Vec<u32>,
}

impl TeamLine {
    fn credit(&mut self, play: &PlayResult) {
        let runs = u32::from(play.runs());
        self.runs += runs;
        self.hits += u32::from(play.hits());
        self.errors += u32::from(play.errors());
        if let Some(inning) = self.by_inning.last_mut() {
            *inning += runs;
        }
    }
}

/// Mutable state of a game in progress.
#[derive(Debug, Clone)]
pub struct GameState {
    pub inning: u32,
    pub half: Half,
    pub outs: u8,
    pub bases: BaseState,
    pub away: TeamLine,
    pub home: TeamLine,
    /// Lineup cursor per team, `[away, home]`.
    pub cursor: [usize; 2],
    pub plate_appearances: u32,
    pub walk_off: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            outs: 0,
            bases: BaseState::empty(),
            away: TeamLine::default(),
            home: TeamLine::default(),
            cursor: [0, 0],
            plate_appearances: 0,
            walk_off: false,
        }
    }

    fn batting_index(&self) -> usize {
        match self.half {
            Half::Top => 0,
            Half::Bottom => 1,
        }
    }

    fn batting_line(&mut self) -> &mut TeamLine {
        match self.half {
            Half::Top => &mut self.away,
            Half::Bottom => &mut self.home,
        }
    }

    pub fn start_half(&mut self, inning: u32, half: Half) {
        self.inning = inning;
        self.half = half;
        self.outs = 0;
        self.bases = BaseState::empty();
        self.batting_line().by_inning.push(0);
    }

    pub fn half_over(&self) -> bool {
        self.outs >= 3 || self.walk_off
    }

    pub fn home_leads(&self) -> bool {
        self.home.runs > self.away.runs
    }

    /// Applies one play. The play must start from the current bases.
    pub fn apply(&mut self, play: &PlayResult) -> Result<()> {
        if play.bases_before() != self.bases {
            return Err(SimError::InvariantViolation(format!(
                "{} started from {} but the bases are {}",
                play.outcome(),
                play.bases_before(),
                self.bases
            )));
        }
        play.check_conservation()?;

        if self.outs >= 3 {
            return Ok(());
        }
        self.bases = play.bases_after();
        self.outs = (self.outs + play.outs()).min(3);
        self.batting_line().credit(play);

        if self.half == Half::Bottom && self.inning >= REGULATION_INNINGS && self.home_leads() {
            self.walk_off = true;
        }
        Ok(())
    }

    fn game_over_after_top(&self) -> bool {
        self.inning >= REGULATION_INNINGS && self.home_leads()
    }

    fn game_over_after_inning(&self) -> bool {
        self.inning >= REGULATION_INNINGS && self.home.runs != self.away.runs
    }
}

/// One logged play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayLogEntry {
    pub inning: u32,
    pub half: Half,
    pub pitcher: u32,
    /// Pitches of the plate appearance as `B C S F X H` codes. Empty for micro events.
    pub pitches: String,
    pub play: PlayResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub away: String,
    pub home: String,
    pub seed: u64,
    pub away_line: TeamLine,
    pub home_line: TeamLine,
    pub innings: u32,
    pub walk_off: bool,
    pub plate_appearances: u32,
    pub plays: Vec<PlayLogEntry>,
}

impl GameSummary {
    pub fn away_runs(&self) -> u32 {
        self.away_line.runs
    }

    pub fn home_runs(&self) -> u32 {
        self.home_line.runs
    }

    pub fn home_won(&self) -> bool {
        self.home_runs() > self.away_runs()
    }

    pub fn winner(&self) -> &str {
        if self.home_won() {
            &self.home
        } else {
            &self.away
        }
    }

    /// Box-score style line score. A skipped bottom half prints as `X`.
    pub fn line_score(&self) -> String {
        let mut out = format!("{:<6}", "");
        for i in 1..=self.innings {
            out.push_str(&format!("{:>3}", i));
        }
        out.push_str("    R  H  E\n");
        for (abbrev, line) in [(&self.away, &self.away_line), (&self.home, &self.home_line)] {
            out.push_str(&format!("{:<6}", abbrev));
            for i in 0..self.innings as usize {
                match line.by_inning.get(i) {
                    Some(r) => out.push_str(&format!("{:>3}", r)),
                    None => out.push_str(&format!("{:>3}", "X")),
                }
            }
            out.push_str(&format!("  {:>3}{:>3}{:>3}\n", line.runs, line.hits, line.errors));
        }
        out
    }
}

/// Plays complete games in one league with one config.
#[derive(Debug, Clone)]
pub struct GameSimulator {
    config: SimConfig,
    registry: ResolverRegistry,
    league: LeagueContext,
}

impl GameSimulator {
    pub fn new(config: SimConfig, league: LeagueContext) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: ResolverRegistry::standard(),
            league,
        })
    }

    /// Replaces the resolver registry.
    pub fn with_registry(mut self, registry: ResolverRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn league(&self) -> &LeagueContext {
        &self.league
    }

    pub fn simulate_game(&self, away: &Team, home: &Team, seed: u64) -> Result<GameSummary> {
        away.validate()?;
        home.validate()?;

        let mut rng = GameRng::new(seed, &self.config.pool);
        let mut state = GameState::new();
        let mut plays = Vec::with_capacity(96);

        let mut inning = 1;
        loop {
            if inning > self.config.limits.max_innings {
                return Err(SimError::InvariantViolation(format!(
                    "{} at {} still tied after {} innings",
                    away.abbrev, home.abbrev, self.config.limits.max_innings
                )));
            }

            state.start_half(inning, Half::Top);
            self.play_half(&mut state, away, home, &mut rng, &mut plays)?;
            if state.game_over_after_top() {
                break;
            }

            state.start_half(inning, Half::Bottom);
            self.play_half(&mut state, home, away, &mut rng, &mut plays)?;
            if state.walk_off || state.game_over_after_inning() {
                break;
            }
            inning += 1;
        }

        info!(
            away = %away.abbrev,
            home = %home.abbrev,
            away_runs = state.away.runs,
            home_runs = state.home.runs,
            innings = state.inning,
            seed,
            "game complete"
        );

        Ok(GameSummary {
            away: away.abbrev.clone(),
            home: home.abbrev.clone(),
            seed,
            away_line: state.away,
            home_line: state.home,
            innings: state.inning,
            walk_off: state.walk_off,
            plate_appearances: state.plate_appearances,
            plays,
        })
    }

    fn play_half(
        &self,
        state: &mut GameState,
        batting: &Team,
        fielding: &Team,
        rng: &mut GameRng,
        log: &mut Vec<PlayLogEntry>,
    ) -> Result<()> {
        let driver = AtBatDriver::new(&self.config, &self.registry);
        // the home park applies to both halves
        let park = match state.half {
            Half::Top => &fielding.park,
            Half::Bottom => &batting.park,
        };
        let side = state.batting_index();
        let limit = self.config.limits.max_plate_appearances_per_half;
        let mut appearances = 0;

        while !state.half_over() {
            appearances += 1;
            if appearances > limit {
                return Err(SimError::InvariantViolation(format!(
                    "{} sent more than {} batters up in inning {}",
                    batting.abbrev, limit, state.inning
                )));
            }

            let batter = &batting.lineup[state.cursor[side] % batting.lineup.len()];
            let situation = Situation::new(state.bases, state.outs, &batting.lineup);
            let at_bat = driver.play(batter, &fielding.pitcher, &self.league, park, situation, rng)?;

            let mut macro_applied = false;
            for play in at_bat.plays() {
                state.apply(play)?;
                macro_applied |= play.outcome().is_macro();
                let pitches = if play.outcome().is_macro() {
                    at_bat.pitches.iter().map(|p| p.as_char()).collect()
                } else {
                    String::new()
                };
                log.push(PlayLogEntry {
                    inning: state.inning,
                    half: state.half,
                    pitcher: fielding.pitcher.id,
                    pitches,
                    play: play.clone(),
                });
                if state.half_over() {
                    break;
                }
            }

            // a micro-event walk-off leaves the plate appearance unfinished
            if macro_applied {
                state.cursor[side] += 1;
                state.plate_appearances += 1;
            }
        }

        debug!(
            inning = state.inning,
            half = ?state.half,
            away = state.away.runs,
            home = state.home.runs,
            "half-inning over"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bases::{Base, Occupancy};
    use crate::engine::outcome::MacroOutcome;
    use crate::engine::play::PlayBuilder;
    use crate::testing::team;

    fn sim() -> GameSimulator {
        GameSimulator::new(SimConfig::default(), LeagueContext::modern()).unwrap()
    }

    #[test]
    fn test_game_is_reproducible() {
        let (away, home) = (team("AWY", 100), team("HOM", 200));
        let a = sim().simulate_game(&away, &home, 2024).unwrap();
        let b = sim().simulate_game(&away, &home, 2024).unwrap();
        assert_eq!(a.away_line, b.away_line);
        assert_eq!(a.home_line, b.home_line);
        assert_eq!(a.plays.len(), b.plays.len());
    }

    #[test]
    fn test_games_end_legally() {
        let (away, home) = (team("AWY", 100), team("HOM", 200));
        for seed in 0..40 {
            let g = sim().simulate_game(&away, &home, seed).unwrap();
            assert_ne!(g.away_runs(), g.home_runs());
            assert!(g.innings >= REGULATION_INNINGS);
            assert_eq!(g.away_line.by_inning.len() as u32, g.innings);
            assert_eq!(g.away_line.by_inning.iter().sum::<u32>(), g.away_runs());
            assert_eq!(g.home_line.by_inning.iter().sum::<u32>(), g.home_runs());
            if g.home_line.by_inning.len() < g.innings as usize {
                // skipped bottom half only when the home team was already ahead
                assert!(g.home_won());
                assert!(!g.walk_off);
            }
            if g.walk_off {
                assert!(g.home_won());
            }
            // a batter comes up at least 3 times per half
            assert!(g.plate_appearances >= 3 * (2 * g.innings - 1));
        }
    }

    #[test]
    fn test_play_log_chains_bases() {
        let (away, home) = (team("AWY", 100), team("HOM", 200));
        let g = sim().simulate_game(&away, &home, 9).unwrap();
        for pair in g.plays.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.inning == next.inning && prev.half == next.half {
                assert_eq!(prev.play.bases_after(), next.play.bases_before());
            } else {
                assert!(next.play.bases_before().is_empty());
            }
        }
    }

    #[test]
    fn test_summary_serializes() {
        let (away, home) = (team("AWY", 100), team("HOM", 200));
        let g = sim().simulate_game(&away, &home, 5).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"away\":\"AWY\""));
        let line = g.line_score();
        assert!(line.contains("AWY"));
        assert!(line.contains("R  H  E"));
    }

    #[test]
    fn test_apply_rejects_stale_bases() {
        let mut state = GameState::new();
        state.start_half(1, Half::Top);
        let mut b = PlayBuilder::new(
            MacroOutcome::Sl,
            BaseState::with_occupancy(Occupancy::FIRST),
            9,
            0,
        );
        b.credit_hit().advance(Base::First, Base::Second).batter_to(Base::First);
        let err = state.apply(&b.finish()).unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation(_)));
    }

    #[test]
    fn test_walk_off_in_bottom_ninth() {
        let mut state = GameState::new();
        state.away.runs = 3;
        state.home.runs = 3;
        state.start_half(9, Half::Bottom);
        let mut b = PlayBuilder::new(MacroOutcome::Hr, BaseState::empty(), 9, 0);
        b.credit_hit().batter_to(Base::Home);
        state.apply(&b.finish()).unwrap();
        assert!(state.walk_off);
        assert!(state.half_over());
        assert_eq!(state.home.by_inning, vec![1]);
    }

    #[test]
    fn test_empty_lineup_rejected() {
        let mut away = team("AWY", 100);
        away.lineup.clear();
        let err = sim().simulate_game(&away, &team("HOM", 200), 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidLineup { .. }));
        assert!(err.is_configuration());
    }
}
