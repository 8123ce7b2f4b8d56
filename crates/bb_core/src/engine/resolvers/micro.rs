//! Micro events between pitches. The batter is never involved.

use super::PlayInput;
use crate::engine::bases::Base;
use crate::engine::config::RunningConfig;
use crate::engine::outcome::MicroEvent;
use crate::engine::play::PlayResult;
use crate::engine::rng::RandomSource;

pub fn wild_pitch(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MicroEvent::Wp);
    b.advance_all(1);
    b.finish()
}

/// Like a wild pitch, and the pitch counts as a ball.
pub fn passed_ball(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MicroEvent::Pb);
    b.advance_all(1).add_balls(1);
    b.finish()
}

pub fn balk(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MicroEvent::Bk);
    b.advance_all(1);
    b.finish()
}

/// Steal of second. Needs a runner on first and second base open.
pub fn stolen_base(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MicroEvent::Sb);
    let bases = input.bases;
    if bases.is_occupied(Base::First) && !bases.is_occupied(Base::Second) {
        if rng.chance(cfg.steal_success) {
            b.advance(Base::First, Base::Second);
        } else {
            b.put_out(Base::First, Base::Second);
        }
    }
    b.finish()
}

/// Pickoff throw to first.
pub fn pickoff(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MicroEvent::Pk);
    if input.bases.is_occupied(Base::First) && rng.chance(cfg.pickoff_success) {
        b.put_out(Base::First, Base::First);
    }
    b.finish()
}
