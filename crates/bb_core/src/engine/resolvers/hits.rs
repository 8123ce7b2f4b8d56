//! Guaranteed hits. The runner on third always scores.

use super::PlayInput;
use crate::engine::bases::Base;
use crate::engine::config::RunningConfig;
use crate::engine::outcome::MacroOutcome;
use crate::engine::play::PlayResult;
use crate::engine::rng::RandomSource;

/// Runner on 2nd may try to score; runner on 1st may try for 3rd when it is free.
/// No runner is sent once the play has made the third out.
pub fn single(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    let bases = input.bases;
    let mut b = input.builder(MacroOutcome::Sl);
    b.credit_hit();

    if bases.is_occupied(Base::Third) {
        b.score(Base::Third);
    }

    let mut third_taken = false;
    if bases.is_occupied(Base::Second) {
        if rng.chance(cfg.single_score_from_second) {
            if rng.chance(cfg.single_out_at_home) {
                b.put_out(Base::Second, Base::Home);
            } else {
                b.score(Base::Second);
            }
        } else {
            b.advance(Base::Second, Base::Third);
            third_taken = true;
        }
    }

    if bases.is_occupied(Base::First) {
        if !third_taken && !b.inning_over() && rng.chance(cfg.single_first_to_third) {
            if rng.chance(cfg.single_out_at_third) {
                b.put_out(Base::First, Base::Third);
            } else {
                b.advance(Base::First, Base::Third);
            }
        } else {
            b.advance(Base::First, Base::Second);
        }
    }

    b.batter_to(Base::First);
    b.finish()
}

/// Every runner moves up one base.
pub fn infield_hit(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Ih);
    b.credit_hit().advance_all(1).batter_to(Base::First);
    b.finish()
}

/// Runners on 2nd and 3rd score; runner on 1st may try to score.
pub fn double(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    let bases = input.bases;
    let mut b = input.builder(MacroOutcome::Dl);
    b.credit_hit();

    if bases.is_occupied(Base::Third) {
        b.score(Base::Third);
    }
    if bases.is_occupied(Base::Second) {
        b.score(Base::Second);
    }
    if bases.is_occupied(Base::First) {
        if rng.chance(cfg.double_score_from_first) {
            if !b.inning_over() && rng.chance(cfg.double_out_at_home) {
                b.put_out(Base::First, Base::Home);
            } else {
                b.score(Base::First);
            }
        } else {
            b.advance(Base::First, Base::Third);
        }
    }

    b.batter_to(Base::Second);
    b.finish()
}

pub fn triple(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Tl);
    b.credit_hit().advance_all(4).batter_to(Base::Third);
    b.finish()
}

pub fn home_run(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Hr);
    b.credit_hit().advance_all(4).batter_to(Base::Home);
    b.finish()
}
