//! # At-bat driver
//!
//! One plate appearance from matchup to resolved play:
//!
//! 1. build the outcome vector (platoon strength drawn once)
//! 2. sample the macro outcome
//! 3. generate the pitch sequence that ends in it
//! 4. walk the pitches; before each non-terminal pitch with runners on,
//!    roll for a micro event and resolve it immediately
//! 5. resolve the macro outcome against the bases as they stand
//!
//! A micro event that records the third out ends the at-bat with no macro
//! play. The batter leads off the next half-inning.

use tracing::{debug, trace};

use super::bases::{Base, BaseState};
use super::batted_ball::generate_batted_ball;
use super::config::{EventConfig, SimConfig};
use super::distribution::{build_outcome_vector, MatchupContext, OutcomeProbabilityVector};
use super::outcome::{MacroOutcome, MicroEvent, PitchCode};
use super::pitch_sequence::{generate_sequence, Count};
use super::play::PlayResult;
use super::probability::PlatoonAdjustment;
use super::resolvers::{PlayInput, ResolverRegistry};
use super::rng::{GameRng, RandomSource};
use super::sampler::sample_outcome;
use crate::error::{Result, SimError};
use crate::models::{LeagueContext, ParkFactors, Player, DEFAULT_SPEED};

/// Game situation an at-bat starts from.
#[derive(Debug, Clone, Copy)]
pub struct Situation<'a> {
    pub bases: BaseState,
    pub outs: u8,
    /// Batting team, used to look up runner speed.
    pub lineup: &'a [Player],
}

impl<'a> Situation<'a> {
    pub fn new(bases: BaseState, outs: u8, lineup: &'a [Player]) -> Self {
        Self { bases, outs, lineup }
    }

    fn runner_speed(&self, bases: &BaseState) -> [u8; 3] {
        let mut speed = [DEFAULT_SPEED; 3];
        for (slot, base) in speed.iter_mut().zip(Base::OCCUPIABLE) {
            if let Some(id) = bases.runner_on(base) {
                if let Some(p) = self.lineup.iter().find(|p| p.id == id) {
                    *slot = p.speed_or_default();
                }
            }
        }
        speed
    }
}

/// Everything that happened in one plate appearance.
#[derive(Debug, Clone)]
pub struct AtBatResult {
    /// Sampled macro outcome. Not played when `play` is `None`.
    pub outcome: MacroOutcome,
    /// Pitches actually thrown, terminal pitch included when the at-bat finished.
    pub pitches: Vec<PitchCode>,
    pub count: Count,
    /// Micro-event plays in the order they happened.
    pub micro_plays: Vec<PlayResult>,
    /// The macro play; `None` when a micro event ended the half-inning first.
    pub play: Option<PlayResult>,
}

impl AtBatResult {
    /// Every play in order: micro events first, then the macro play.
    pub fn plays(&self) -> impl Iterator<Item = &PlayResult> {
        self.micro_plays.iter().chain(self.play.iter())
    }

    pub fn completed(&self) -> bool {
        self.play.is_some()
    }

    pub fn runs(&self) -> u32 {
        self.plays().map(|p| u32::from(p.runs())).sum()
    }

    pub fn outs(&self) -> u8 {
        self.plays().map(|p| p.outs()).sum()
    }
}

/// Drives plate appearances with one config and one resolver registry.
#[derive(Debug, Clone, Copy)]
pub struct AtBatDriver<'a> {
    config: &'a SimConfig,
    registry: &'a ResolverRegistry,
}

impl<'a> AtBatDriver<'a> {
    pub fn new(config: &'a SimConfig, registry: &'a ResolverRegistry) -> Self {
        Self { config, registry }
    }

    /// Outcome vector for this matchup. Draws the platoon strength from `rng`.
    pub fn matchup(
        &self,
        batter: &Player,
        pitcher: &Player,
        league: &LeagueContext,
        park: &ParkFactors,
        rng: &mut dyn RandomSource,
    ) -> Result<OutcomeProbabilityVector> {
        let platoon = PlatoonAdjustment::draw(batter.bats, pitcher.throws, &self.config.platoon, rng)
            .map(|adj| (&self.config.platoon, adj));
        let ctx = MatchupContext {
            league,
            park,
            method: self.config.combine,
            platoon,
        };
        build_outcome_vector(batter, pitcher, &ctx)
    }

    pub fn play(
        &self,
        batter: &Player,
        pitcher: &Player,
        league: &LeagueContext,
        park: &ParkFactors,
        situation: Situation<'_>,
        rng: &mut GameRng,
    ) -> Result<AtBatResult> {
        let vector = self.matchup(batter, pitcher, league, park, &mut rng.platoon)?;
        let outcome = sample_outcome(&vector, &mut rng.outcome, &mut rng.contact);
        let sequence = generate_sequence(outcome, &mut rng.pitch);

        let limit = self.config.limits.max_pitches_per_at_bat as usize;
        let mut bases = situation.bases;
        let mut outs = situation.outs;
        let mut count = Count::default();
        let mut pitches = Vec::with_capacity(sequence.len());
        let mut micro_plays = Vec::new();
        let last = sequence.len().saturating_sub(1);

        for (idx, pitch) in sequence.iter().copied().enumerate() {
            if pitches.len() + micro_plays.len() >= limit {
                return Err(SimError::InvariantViolation(format!(
                    "at-bat for {} exceeded {} pitch events",
                    batter.id, limit
                )));
            }

            let mut ball_credited = false;
            if idx < last && !bases.is_empty() {
                if let Some(event) = roll_micro_event(&self.config.events, &bases, pitch, &mut rng.micro) {
                    let input = PlayInput::new(bases, batter.id, outs)
                        .with_runner_speed(situation.runner_speed(&bases));
                    let micro = self.registry.resolve(event, &input, &self.config.running, &mut rng.running)?;
                    trace!(event = %event, summary = %micro.summary(), "micro event");

                    bases = micro.bases_after();
                    outs += micro.outs();
                    if micro.balls_delta() > 0 {
                        count.balls += micro.balls_delta();
                        ball_credited = true;
                    }
                    micro_plays.push(micro);

                    if outs >= 3 {
                        debug!(batter = batter.id, "third out on a micro event, at-bat abandoned");
                        return Ok(AtBatResult {
                            outcome,
                            pitches,
                            count,
                            micro_plays,
                            play: None,
                        });
                    }
                }
            }

            pitches.push(pitch);
            if !ball_credited {
                count = count.after(pitch);
            }
        }

        let batted_ball = generate_batted_ball(outcome, batter, pitcher.throws, &mut rng.batted_ball);
        let input = PlayInput::new(bases, batter.id, outs)
            .with_runner_speed(situation.runner_speed(&bases))
            .with_batted_ball(batted_ball);
        let play = self.registry.resolve(outcome, &input, &self.config.running, &mut rng.running)?;

        Ok(AtBatResult {
            outcome,
            pitches,
            count,
            micro_plays,
            play: Some(play),
        })
    }
}

/// One draw per pitch picks at most one event.
///
/// Bands in order: pickoff, steal, wild pitch, passed ball, balk. A band whose
/// precondition fails yields no event. Wild pitches and passed balls only
/// happen on a ball.
fn roll_micro_event(
    cfg: &EventConfig,
    bases: &BaseState,
    pitch: PitchCode,
    rng: &mut dyn RandomSource,
) -> Option<MicroEvent> {
    if !cfg.enabled {
        return None;
    }
    let r = rng.next_uniform();
    let first = bases.is_occupied(Base::First);
    let bands = [
        (cfg.pickoff_attempt, MicroEvent::Pk, first),
        (
            cfg.steal_attempt,
            MicroEvent::Sb,
            first && !bases.is_occupied(Base::Second),
        ),
        (cfg.wild_pitch, MicroEvent::Wp, pitch == PitchCode::B),
        (cfg.passed_ball, MicroEvent::Pb, pitch == PitchCode::B),
        (cfg.balk, MicroEvent::Bk, true),
    ];
    let mut upper = 0.0;
    for (rate, event, eligible) in bands {
        upper += rate;
        if r < upper {
            return eligible.then_some(event);
        }
    }
    None
}
