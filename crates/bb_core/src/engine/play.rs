//! Play results and the runner bookkeeping that produces them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bases::{Base, BaseState};
use super::batted_ball::BattedBall;
use super::outcome::OutcomeCode;
use crate::error::{Result, SimError};
use crate::models::PlayerId;

/// What happened to one runner (or the batter) on a play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerDisposition {
    pub runner: PlayerId,
    pub start: Base,
    /// `None` when the runner was put out.
    pub end: Option<Base>,
    pub out_at: Option<Base>,
    pub advanced: bool,
    pub held: bool,
    pub scored: bool,
    pub was_out: bool,
    pub description: String,
}

/// Immutable record of one resolved play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    outcome: OutcomeCode,
    batter: PlayerId,
    outs_before: u8,
    runs: u8,
    hits: u8,
    outs: u8,
    errors: u8,
    balls_delta: u8,
    bases_before: BaseState,
    bases_after: BaseState,
    runners: Vec<RunnerDisposition>,
    batted_ball: Option<BattedBall>,
}

impl PlayResult {
    pub fn outcome(&self) -> OutcomeCode {
        self.outcome
    }

    pub fn batter(&self) -> PlayerId {
        self.batter
    }

    pub fn outs_before(&self) -> u8 {
        self.outs_before
    }

    /// True once this play has recorded the third out of the half.
    pub fn inning_over(&self) -> bool {
        self.outs_before + self.outs >= 3
    }

    pub fn runs(&self) -> u8 {
        self.runs
    }

    pub fn hits(&self) -> u8 {
        self.hits
    }

    pub fn outs(&self) -> u8 {
        self.outs
    }

    pub fn errors(&self) -> u8 {
        self.errors
    }

    /// Extra balls to add to the count (a passed ball).
    pub fn balls_delta(&self) -> u8 {
        self.balls_delta
    }

    pub fn bases_before(&self) -> BaseState {
        self.bases_before
    }

    pub fn bases_after(&self) -> BaseState {
        self.bases_after
    }

    pub fn runners(&self) -> &[RunnerDisposition] {
        &self.runners
    }

    pub fn batted_ball(&self) -> Option<&BattedBall> {
        self.batted_ball.as_ref()
    }

    pub fn batter_disposition(&self) -> Option<&RunnerDisposition> {
        self.runners.iter().find(|d| d.start == Base::Batter)
    }

    /// Batter ended the play on base or across the plate.
    pub fn batter_reached(&self) -> bool {
        self.batter_disposition().map(|d| !d.was_out).unwrap_or(false)
    }

    /// Checks runner conservation and base uniqueness:
    /// `after = before + batter - outs - runs`, every runner on base accounted for.
    pub fn check_conservation(&self) -> Result<()> {
        self.bases_after.check_consistency()?;

        let batter_in_play = i32::from(self.batter_disposition().is_some());
        let expected = self.bases_before.runner_count() as i32 + batter_in_play
            - i32::from(self.outs)
            - i32::from(self.runs);
        let actual = self.bases_after.runner_count() as i32;
        if expected != actual {
            return Err(SimError::InvariantViolation(format!(
                "{}: {} -> {} runners with {} out and {} scored",
                self.outcome,
                self.bases_before,
                self.bases_after,
                self.outs,
                self.runs
            )));
        }

        for base in Base::OCCUPIABLE {
            if let Some(id) = self.bases_after.runner_on(base) {
                let tracked = self
                    .runners
                    .iter()
                    .any(|d| d.runner == id && d.end == Some(base));
                if !tracked {
                    return Err(SimError::InvariantViolation(format!(
                        "{}: runner {} on {} has no disposition",
                        self.outcome, id, base
                    )));
                }
            }
        }
        Ok(())
    }

    /// One-line scorer's summary.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.outcome.to_string()];
        if let Some(bb) = &self.batted_ball {
            parts.push(bb.location_code());
        }
        for d in &self.runners {
            parts.push(d.description.clone());
        }
        parts.join("; ")
    }
}

/// Accumulates runner moves for a play over an immutable `before` snapshot.
///
/// Starting runners that no call touches are held in place by `finish`.
#[derive(Debug, Clone)]
pub struct PlayBuilder {
    outcome: OutcomeCode,
    batter: PlayerId,
    outs_before: u8,
    before: BaseState,
    after: BaseState,
    touched: [bool; 3],
    runners: Vec<RunnerDisposition>,
    runs: u8,
    hits: u8,
    outs: u8,
    balls_delta: u8,
    batted_ball: Option<BattedBall>,
}

impl PlayBuilder {
    pub fn new(outcome: impl Into<OutcomeCode>, before: BaseState, batter: PlayerId, outs_before: u8) -> Self {
        Self {
            outcome: outcome.into(),
            batter,
            outs_before,
            before,
            after: BaseState::empty(),
            touched: [false; 3],
            runners: Vec::with_capacity(4),
            runs: 0,
            hits: 0,
            outs: 0,
            balls_delta: 0,
            batted_ball: None,
        }
    }

    /// Relabels the play (a groundout that became a fielder's choice).
    pub fn relabel(&mut self, outcome: impl Into<OutcomeCode>) -> &mut Self {
        self.outcome = outcome.into();
        self
    }

    pub fn credit_hit(&mut self) -> &mut Self {
        self.hits = 1;
        self
    }

    pub fn add_balls(&mut self, n: u8) -> &mut Self {
        self.balls_delta += n;
        self
    }

    pub fn batted_ball(&mut self, bb: Option<BattedBall>) -> &mut Self {
        self.batted_ball = bb;
        self
    }

    fn runner_at(&mut self, from: Base) -> Option<PlayerId> {
        match from {
            Base::Batter => Some(self.batter),
            Base::Home => None,
            base => {
                let idx = base.index()?;
                if self.touched[idx] {
                    warn!(outcome = %self.outcome, base = %base, "runner moved twice in one play");
                    return None;
                }
                self.touched[idx] = true;
                self.before.runner_on(base)
            }
        }
    }

    fn place(&mut self, runner: PlayerId, base: Base) {
        if self.after.is_occupied(base) {
            warn!(outcome = %self.outcome, base = %base, runner, "base already taken");
        }
        self.after = self.after.with(base, Some(runner));
    }

    /// Moves the runner starting at `from` to `to`. `Home` scores a run.
    pub fn advance(&mut self, from: Base, to: Base) -> &mut Self {
        let Some(runner) = self.runner_at(from) else {
            return self;
        };
        let scored = to == Base::Home;
        let held = from == to;
        if scored {
            self.runs += 1;
        } else {
            self.place(runner, to);
        }
        let description = if scored {
            format!("{} scores from {}", runner, from)
        } else if held {
            format!("{} holds at {}", runner, from)
        } else {
            format!("{} {} to {}", runner, from, to)
        };
        self.runners.push(RunnerDisposition {
            runner,
            start: from,
            end: Some(to),
            out_at: None,
            advanced: !held,
            held,
            scored,
            was_out: false,
            description,
        });
        self
    }

    pub fn score(&mut self, from: Base) -> &mut Self {
        self.advance(from, Base::Home)
    }

    pub fn hold(&mut self, at: Base) -> &mut Self {
        self.advance(at, at)
    }

    /// Retires the runner starting at `from`, out at `at`.
    pub fn put_out(&mut self, from: Base, at: Base) -> &mut Self {
        let Some(runner) = self.runner_at(from) else {
            return self;
        };
        self.outs += 1;
        let description = if from == Base::Batter && at == Base::Batter {
            format!("{} out", runner)
        } else if from == Base::Batter {
            format!("{} out at {}", runner, at)
        } else {
            format!("{} from {} out at {}", runner, from, at)
        };
        self.runners.push(RunnerDisposition {
            runner,
            start: from,
            end: None,
            out_at: Some(at),
            advanced: false,
            held: false,
            scored: false,
            was_out: true,
            description,
        });
        self
    }

    /// Batter thrown out at first.
    pub fn batter_out(&mut self) -> &mut Self {
        self.put_out(Base::Batter, Base::First)
    }

    /// Batter retired without a play on the bases (strikeout, caught fly).
    pub fn batter_retired(&mut self) -> &mut Self {
        self.put_out(Base::Batter, Base::Batter)
    }

    pub fn outs_before(&self) -> u8 {
        self.outs_before
    }

    /// True once this play has recorded the third out of the half.
    pub fn inning_over(&self) -> bool {
        self.outs_before + self.outs >= 3
    }

    pub fn batter_to(&mut self, base: Base) -> &mut Self {
        self.advance(Base::Batter, base)
    }

    /// Every starting runner moves up `n` bases.
    pub fn advance_all(&mut self, n: usize) -> &mut Self {
        for base in [Base::Third, Base::Second, Base::First] {
            if self.before.is_occupied(base) {
                let mut to = base;
                for _ in 0..n {
                    to = to.next();
                }
                self.advance(base, to);
            }
        }
        self
    }

    /// Forced advances only: each runner moves up one base if the base behind is forced.
    pub fn force_advance(&mut self) -> &mut Self {
        let first = self.before.is_occupied(Base::First);
        let second = self.before.is_occupied(Base::Second);
        let third = self.before.is_occupied(Base::Third);
        if first && second && third {
            self.score(Base::Third);
        }
        if first && second {
            self.advance(Base::Second, Base::Third);
        }
        if first {
            self.advance(Base::First, Base::Second);
        }
        self.batter_to(Base::First)
    }

    pub fn finish(mut self) -> PlayResult {
        for base in Base::OCCUPIABLE {
            let idx = base.index().unwrap_or_default();
            if !self.touched[idx] && self.before.is_occupied(base) {
                self.hold(base);
            }
        }
        PlayResult {
            outcome: self.outcome,
            batter: self.batter,
            outs_before: self.outs_before,
            runs: self.runs,
            hits: self.hits,
            outs: self.outs,
            errors: 0,
            balls_delta: self.balls_delta,
            bases_before: self.before,
            bases_after: self.after,
            runners: self.runners,
            batted_ball: self.batted_ball,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bases::Occupancy;
    use crate::engine::outcome::{MacroOutcome, MicroEvent};

    #[test]
    fn test_untouched_runners_hold() {
        let before = BaseState::with_occupancy(Occupancy::FIRST_THIRD);
        let mut b = PlayBuilder::new(MacroOutcome::Po, before, 9, 0);
        b.batter_out();
        let play = b.finish();
        assert_eq!(play.bases_after(), before);
        assert_eq!(play.outs(), 1);
        assert_eq!(play.runs(), 0);
        assert!(play.runners().iter().filter(|d| d.held).count() == 2);
        assert!(play.check_conservation().is_ok());
    }

    #[test]
    fn test_force_advance_bases_loaded() {
        let before = BaseState::with_occupancy(Occupancy::LOADED);
        let mut b = PlayBuilder::new(MacroOutcome::Bb, before, 9, 1);
        b.force_advance();
        let play = b.finish();
        assert_eq!(play.runs(), 1);
        assert_eq!(play.bases_after().runner_on(Base::First), Some(9));
        assert_eq!(play.bases_after().runner_on(Base::Second), Some(101));
        assert_eq!(play.bases_after().runner_on(Base::Third), Some(102));
        assert!(play.check_conservation().is_ok());
    }

    #[test]
    fn test_force_advance_leaves_unforced_runner() {
        let before = BaseState::with_occupancy(Occupancy::THIRD);
        let mut b = PlayBuilder::new(MacroOutcome::Hp, before, 9, 0);
        b.force_advance();
        let play = b.finish();
        assert_eq!(play.runs(), 0);
        assert_eq!(play.bases_after().occupancy(), Occupancy::FIRST_THIRD);
    }

    #[test]
    fn test_conservation_detects_lost_runner() {
        let before = BaseState::with_occupancy(Occupancy::FIRST_SECOND);
        let mut b = PlayBuilder::new(MicroEvent::Wp, before, 9, 0);
        // moving 1st onto 2nd while 2nd holds drops a runner
        b.advance(Base::First, Base::Second);
        let play = b.finish();
        assert!(matches!(
            play.check_conservation(),
            Err(SimError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_summary_lists_runners() {
        let before = BaseState::with_occupancy(Occupancy::SECOND);
        let mut b = PlayBuilder::new(MacroOutcome::Sl, before, 9, 0);
        b.credit_hit().score(Base::Second).batter_to(Base::First);
        let play = b.finish();
        assert_eq!(play.hits(), 1);
        assert!(play.batter_reached());
        assert_eq!(play.summary(), "SL; 102 scores from 2nd; 9 batter to 1st");
    }
}
