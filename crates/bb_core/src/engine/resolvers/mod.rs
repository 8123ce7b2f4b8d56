//! Outcome resolvers.
//!
//! Each resolver is a pure transition from `(bases, outs_before, batter)` to a
//! [`PlayResult`]. Dispatch goes through an explicit [`ResolverRegistry`]
//! built once and handed to the at-bat driver; there is no global table.
//!
//! Families:
//! - forced advance: BB, HP ([`free`])
//! - guaranteed hit: IH, SL, DL, TL, HR ([`hits`])
//! - contested out: SO, FO, LO, PO ([`outs`]) and GO, DP, FC ([`groundouts`])
//! - micro events: WP, PB, BK, SB, PK ([`micro`])

pub mod free;
pub mod groundouts;
pub mod hits;
pub mod micro;
pub mod outs;

use fxhash::FxHashMap;
use tracing::debug;

use super::bases::{BaseState, Base};
use super::batted_ball::BattedBall;
use super::config::RunningConfig;
use super::outcome::{MacroOutcome, MicroEvent, OutcomeCode};
use super::play::{PlayBuilder, PlayResult};
use super::rng::RandomSource;
use crate::error::{Result, SimError};
use crate::models::{PlayerId, DEFAULT_SPEED};

/// Narrow read-only view of the game a resolver is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayInput {
    pub bases: BaseState,
    pub batter: PlayerId,
    pub outs_before: u8,
    /// Speed (1..=10) of the runners on 1st, 2nd, 3rd.
    pub runner_speed: [u8; 3],
    pub batted_ball: Option<BattedBall>,
}

impl PlayInput {
    pub fn new(bases: BaseState, batter: PlayerId, outs_before: u8) -> Self {
        Self {
            bases,
            batter,
            outs_before,
            runner_speed: [DEFAULT_SPEED; 3],
            batted_ball: None,
        }
    }

    pub fn with_batted_ball(mut self, bb: Option<BattedBall>) -> Self {
        self.batted_ball = bb;
        self
    }

    pub fn with_runner_speed(mut self, speed: [u8; 3]) -> Self {
        self.runner_speed = speed;
        self
    }

    pub fn speed_on(&self, base: Base) -> u8 {
        base.index()
            .map(|i| self.runner_speed[i])
            .unwrap_or(DEFAULT_SPEED)
    }

    pub(crate) fn builder(&self, outcome: impl Into<OutcomeCode>) -> PlayBuilder {
        let mut b = PlayBuilder::new(outcome, self.bases, self.batter, self.outs_before);
        b.batted_ball(self.batted_ball);
        b
    }
}

pub type ResolverFn = fn(&PlayInput, &RunningConfig, &mut dyn RandomSource) -> PlayResult;

/// One scenario of a per-state table.
pub(crate) type Branch = (f64, fn(&mut PlayBuilder));

/// Picks a branch by cumulative weight; a miss falls back to the last branch.
pub(crate) fn choose(branches: &[Branch], rng: &mut dyn RandomSource) -> fn(&mut PlayBuilder) {
    let r = rng.next_uniform();
    let mut cumulative = 0.0;
    for (weight, apply) in branches {
        cumulative += weight;
        if r < cumulative {
            return *apply;
        }
    }
    match branches.last() {
        Some((_, apply)) => *apply,
        None => |_: &mut PlayBuilder| {},
    }
}

/// Outcome code → resolver.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    table: FxHashMap<OutcomeCode, ResolverFn>,
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut codes: Vec<&str> = self.table.keys().map(|c| c.code()).collect();
        codes.sort_unstable();
        f.debug_struct("ResolverRegistry").field("codes", &codes).finish()
    }
}

impl ResolverRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every macro outcome and micro event wired to its resolver.
    pub fn standard() -> Self {
        Self::empty()
            .with(MacroOutcome::Bb, free::walk)
            .with(MacroOutcome::Hp, free::hit_by_pitch)
            .with(MacroOutcome::Ih, hits::infield_hit)
            .with(MacroOutcome::Sl, hits::single)
            .with(MacroOutcome::Dl, hits::double)
            .with(MacroOutcome::Tl, hits::triple)
            .with(MacroOutcome::Hr, hits::home_run)
            .with(MacroOutcome::So, outs::strikeout)
            .with(MacroOutcome::Fo, outs::flyout)
            .with(MacroOutcome::Lo, outs::lineout)
            .with(MacroOutcome::Po, outs::popout)
            .with(MacroOutcome::Go, groundouts::groundout)
            .with(MacroOutcome::Dp, groundouts::double_play)
            .with(MacroOutcome::Fc, groundouts::fielders_choice)
            .with(MicroEvent::Wp, micro::wild_pitch)
            .with(MicroEvent::Pb, micro::passed_ball)
            .with(MicroEvent::Bk, micro::balk)
            .with(MicroEvent::Sb, micro::stolen_base)
            .with(MicroEvent::Pk, micro::pickoff)
    }

    /// Registers (or replaces) the resolver for `code`.
    pub fn with(mut self, code: impl Into<OutcomeCode>, resolver: ResolverFn) -> Self {
        self.table.insert(code.into(), resolver);
        self
    }

    pub fn get(&self, code: OutcomeCode) -> Option<ResolverFn> {
        self.table.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolves `code`. An unregistered code is a configuration error.
    pub fn resolve(
        &self,
        code: impl Into<OutcomeCode>,
        input: &PlayInput,
        running: &RunningConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<PlayResult> {
        let code = code.into();
        let resolver = self.get(code).ok_or(SimError::NoResolver(code))?;
        let play = resolver(input, running, rng);
        debug!(
            outcome = %play.outcome(),
            before = %play.bases_before(),
            after = %play.bases_after(),
            outs = play.outs(),
            runs = play.runs(),
            "play resolved"
        );
        Ok(play)
    }
}

/// Resolves one outcome with the standard registry and default running rates.
pub fn resolve(
    code: OutcomeCode,
    bases: BaseState,
    batter: PlayerId,
    outs_before: u8,
    rng: &mut dyn RandomSource,
) -> Result<PlayResult> {
    ResolverRegistry::standard().resolve(
        code,
        &PlayInput::new(bases, batter, outs_before),
        &RunningConfig::default(),
        rng,
    )
}
