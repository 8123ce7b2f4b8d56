//! Groundouts, double plays and fielder's choices.
//!
//! With a runner on first and fewer than two outs a double-play branch is
//! rolled first. Otherwise the single-out table for the base occupancy picks
//! exactly one scenario. Every table's weights sum to 1.

use super::{choose, Branch, PlayInput};
use crate::engine::bases::Occupancy;
use crate::engine::config::RunningConfig;
use crate::engine::outcome::MacroOutcome;
use crate::engine::play::{PlayBuilder, PlayResult};
use crate::engine::rng::RandomSource;

use crate::engine::bases::Base::{Batter, First, Home, Second, Third};

// ============================================================================
// Scenarios
// ============================================================================

fn fc(b: &mut PlayBuilder) {
    b.relabel(MacroOutcome::Fc);
    b.batter_to(First);
}

fn batter_out(b: &mut PlayBuilder) {
    b.batter_out();
}

fn batter_out_first_to_second(b: &mut PlayBuilder) {
    b.advance(First, Second).batter_out();
}

fn force_at_second(b: &mut PlayBuilder) {
    b.put_out(First, Second);
    fc(b);
}

fn batter_out_second_to_third(b: &mut PlayBuilder) {
    b.advance(Second, Third).batter_out();
}

fn batter_out_run_scores(b: &mut PlayBuilder) {
    b.score(Third).batter_out();
}

fn out_at_home(b: &mut PlayBuilder) {
    b.put_out(Third, Home);
    fc(b);
}

fn lead_out_at_third_first_to_second(b: &mut PlayBuilder) {
    b.put_out(Second, Third).advance(First, Second);
    fc(b);
}

fn force_at_second_lead_to_third(b: &mut PlayBuilder) {
    b.advance(Second, Third).put_out(First, Second);
    fc(b);
}

fn batter_out_both_advance(b: &mut PlayBuilder) {
    b.advance(Second, Third).advance(First, Second).batter_out();
}

fn out_at_home_first_to_second(b: &mut PlayBuilder) {
    b.put_out(Third, Home).advance(First, Second);
    fc(b);
}

fn force_at_second_run_scores(b: &mut PlayBuilder) {
    b.score(Third).put_out(First, Second);
    fc(b);
}

fn batter_out_first_to_second_run_scores(b: &mut PlayBuilder) {
    b.score(Third).advance(First, Second).batter_out();
}

fn batter_out_lead_advances_run_scores(b: &mut PlayBuilder) {
    b.score(Third).advance(Second, Third).batter_out();
}

fn out_at_home_second_to_third(b: &mut PlayBuilder) {
    b.put_out(Third, Home).advance(Second, Third);
    fc(b);
}

fn loaded_out_at_home(b: &mut PlayBuilder) {
    b.put_out(Third, Home).advance(Second, Third).advance(First, Second);
    fc(b);
}

fn loaded_force_at_second(b: &mut PlayBuilder) {
    b.score(Third).advance(Second, Third).put_out(First, Second);
    fc(b);
}

fn loaded_batter_out_all_advance(b: &mut PlayBuilder) {
    b.score(Third)
        .advance(Second, Third)
        .advance(First, Second)
        .batter_out();
}

fn loaded_out_at_third(b: &mut PlayBuilder) {
    b.score(Third).put_out(Second, Third).advance(First, Second);
    fc(b);
}

// ============================================================================
// Single-out tables, fewer than two outs
// ============================================================================

const GO_EMPTY: &[Branch] = &[(1.0, batter_out)];

const GO_FIRST: &[Branch] = &[(0.65, batter_out_first_to_second), (0.35, force_at_second)];

const GO_SECOND: &[Branch] = &[(0.70, batter_out), (0.30, batter_out_second_to_third)];

const GO_THIRD: &[Branch] = &[
    (0.340, batter_out_run_scores),
    (0.035, out_at_home),
    (0.625, batter_out),
];

const GO_FIRST_SECOND: &[Branch] = &[
    (0.035, lead_out_at_third_first_to_second),
    (0.565, force_at_second_lead_to_third),
    (0.400, batter_out_both_advance),
];

const GO_FIRST_THIRD: &[Branch] = &[
    (0.15, out_at_home_first_to_second),
    (0.35, force_at_second_run_scores),
    (0.30, batter_out_first_to_second_run_scores),
    (0.20, batter_out_first_to_second),
];

const GO_SECOND_THIRD: &[Branch] = &[
    (0.60, batter_out_lead_advances_run_scores),
    (0.25, batter_out_run_scores),
    (0.10, out_at_home_second_to_third),
    (0.05, batter_out),
];

const GO_LOADED: &[Branch] = &[
    (0.40, loaded_out_at_home),
    (0.35, loaded_force_at_second),
    (0.15, loaded_batter_out_all_advance),
    (0.10, loaded_out_at_third),
];

/// Two outs: only the force at second competes with the out at first.
const GO_FIRST_TWO_OUTS: &[Branch] = &[(0.35, force_at_second), (0.65, batter_out)];

pub(crate) fn single_out_table(occ: Occupancy, outs_before: u8) -> &'static [Branch] {
    if outs_before >= 2 {
        return if occ == Occupancy::FIRST {
            GO_FIRST_TWO_OUTS
        } else {
            GO_EMPTY
        };
    }
    match occ {
        Occupancy::FIRST => GO_FIRST,
        Occupancy::SECOND => GO_SECOND,
        Occupancy::THIRD => GO_THIRD,
        Occupancy::FIRST_SECOND => GO_FIRST_SECOND,
        Occupancy::FIRST_THIRD => GO_FIRST_THIRD,
        Occupancy::SECOND_THIRD => GO_SECOND_THIRD,
        Occupancy::LOADED => GO_LOADED,
        _ => GO_EMPTY,
    }
}

// ============================================================================
// Double-play tables
// ============================================================================

/// A run from third on a double play counts only when it is not the third out.
fn third_scores_with_nobody_out(b: &mut PlayBuilder) {
    if b.outs_before() == 0 {
        b.score(Third);
    } else {
        b.hold(Third);
    }
}

fn dp_standard(b: &mut PlayBuilder) {
    b.put_out(First, Second).batter_out();
}

fn dp_lead_to_third(b: &mut PlayBuilder) {
    b.advance(Second, Third);
    dp_standard(b);
}

fn dp_third_and_second(b: &mut PlayBuilder) {
    b.put_out(Second, Third).put_out(First, Second).batter_to(First);
}

fn dp_lead_at_third_batter_out(b: &mut PlayBuilder) {
    b.put_out(Second, Third).advance(First, Second).batter_out();
}

fn dp_corners(b: &mut PlayBuilder) {
    third_scores_with_nobody_out(b);
    dp_standard(b);
}

fn dp_loaded_home_to_first(b: &mut PlayBuilder) {
    b.put_out(Third, Home)
        .advance(Second, Third)
        .advance(First, Second)
        .batter_out();
}

fn dp_loaded_home_and_third(b: &mut PlayBuilder) {
    b.put_out(Third, Home)
        .put_out(Second, Third)
        .advance(First, Second)
        .batter_to(First);
}

fn dp_loaded_standard(b: &mut PlayBuilder) {
    third_scores_with_nobody_out(b);
    b.advance(Second, Third);
    dp_standard(b);
}

fn dp_loaded_third_and_second(b: &mut PlayBuilder) {
    third_scores_with_nobody_out(b);
    dp_third_and_second(b);
}

const DP_FIRST: &[Branch] = &[(1.0, dp_standard)];

const DP_FIRST_SECOND: &[Branch] = &[
    (0.28, dp_lead_to_third),
    (0.70, dp_third_and_second),
    (0.02, dp_lead_at_third_batter_out),
];

const DP_FIRST_THIRD: &[Branch] = &[(1.0, dp_corners)];

const DP_LOADED: &[Branch] = &[
    (0.20, dp_loaded_home_to_first),
    (0.04, dp_loaded_home_and_third),
    (0.72, dp_loaded_standard),
    (0.04, dp_loaded_third_and_second),
];

/// `None` when no double play is possible: first base empty or two outs.
pub(crate) fn double_play_table(occ: Occupancy, outs_before: u8) -> Option<&'static [Branch]> {
    if outs_before >= 2 {
        return None;
    }
    match occ {
        Occupancy::FIRST => Some(DP_FIRST),
        Occupancy::FIRST_SECOND => Some(DP_FIRST_SECOND),
        Occupancy::FIRST_THIRD => Some(DP_FIRST_THIRD),
        Occupancy::LOADED => Some(DP_LOADED),
        _ => None,
    }
}

// ============================================================================
// Resolvers
// ============================================================================

fn single_out(input: &PlayInput, rng: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Go);
    let table = single_out_table(input.bases.occupancy(), input.outs_before);
    choose(table, rng)(&mut b);
    b.finish()
}

fn turn_double_play(table: &[Branch], input: &PlayInput, rng: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Dp);
    choose(table, rng)(&mut b);
    b.finish()
}

/// Rolls the double-play branch, then the single-out table.
pub fn groundout(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    if let Some(table) = double_play_table(input.bases.occupancy(), input.outs_before) {
        if rng.chance(cfg.double_play_rate) {
            return turn_double_play(table, input, rng);
        }
    }
    single_out(input, rng)
}

/// Forces the double play when eligible; otherwise an ordinary groundout.
pub fn double_play(input: &PlayInput, _: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    match double_play_table(input.bases.occupancy(), input.outs_before) {
        Some(table) => turn_double_play(table, input, rng),
        None => single_out(input, rng),
    }
}

/// The defense retires the lead forced runner (or the lead runner when none
/// is forced) and the batter reaches first.
pub fn fielders_choice(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let bases = input.bases;
    let mut b = input.builder(MacroOutcome::Fc);
    if bases.is_empty() {
        b.relabel(MacroOutcome::Go).batter_out();
        return b.finish();
    }

    let first = bases.is_occupied(First);
    let second = bases.is_occupied(Second);
    let third = bases.is_occupied(Third);
    if first {
        // force at the lead forced base; trailing forced runners move up
        match (second, third) {
            (true, true) => {
                b.put_out(Third, Home).advance(Second, Third).advance(First, Second);
            }
            (true, false) => {
                b.put_out(Second, Third).advance(First, Second);
            }
            _ => {
                b.put_out(First, Second);
            }
        }
    } else {
        let lead = if third { Third } else { Second };
        b.put_out(lead, lead.next());
    }
    b.advance(Batter, First);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bases::BaseState;
    use crate::engine::outcome::OutcomeCode;
    use crate::engine::rng::ScriptedRandom;

    fn input(occ: Occupancy, outs: u8) -> PlayInput {
        PlayInput::new(BaseState::with_occupancy(occ), 9, outs)
    }

    fn weight_sum(table: &[Branch]) -> f64 {
        table.iter().map(|(w, _)| w).sum()
    }

    #[test]
    fn test_every_table_sums_to_one() {
        for occ in Occupancy::ALL {
            for outs in 0..3 {
                let s = weight_sum(single_out_table(occ, outs));
                assert!((s - 1.0).abs() < 1e-12, "single-out {} {} outs: {}", occ, outs, s);
                if let Some(dp) = double_play_table(occ, outs) {
                    let s = weight_sum(dp);
                    assert!((s - 1.0).abs() < 1e-12, "double play {} {} outs: {}", occ, outs, s);
                }
            }
        }
    }

    #[test]
    fn test_double_play_eligibility() {
        for occ in Occupancy::ALL {
            for outs in 0..3 {
                let eligible = double_play_table(occ, outs).is_some();
                assert_eq!(eligible, occ.has(First) && outs < 2, "{} {}", occ, outs);
            }
        }
    }

    #[test]
    fn test_every_branch_conserves_runners() {
        for occ in Occupancy::ALL {
            for outs in 0..3u8 {
                let mut tables = vec![single_out_table(occ, outs)];
                tables.extend(double_play_table(occ, outs));
                for table in tables {
                    for (_, apply) in table {
                        let i = input(occ, outs);
                        let mut b = i.builder(MacroOutcome::Go);
                        apply(&mut b);
                        let play = b.finish();
                        assert!(
                            play.check_conservation().is_ok(),
                            "{} {} outs: {}",
                            occ,
                            outs,
                            play.summary()
                        );
                        assert!((1..=2).contains(&play.outs()));
                        assert!(play.outs() + outs <= 3);
                    }
                }
            }
        }
    }

    #[test]
    fn test_loaded_nobody_out_groundout() {
        let cfg = RunningConfig::default();
        for draw in [0.0, 0.2, 0.4, 0.46, 0.6, 0.8, 0.95, 0.999] {
            let play = groundout(&input(Occupancy::LOADED, 0), &cfg, &mut ScriptedRandom::constant(draw));
            assert!(play.outs() == 1 || play.outs() == 2, "draw {}", draw);
            assert!(play.check_conservation().is_ok());
        }
    }

    #[test]
    fn test_double_play_branch_fires_first() {
        let cfg = RunningConfig::default();
        // 0.2 < 0.455 turns two; 0.2 picks the standard DP
        let play = groundout(&input(Occupancy::FIRST, 0), &cfg, &mut ScriptedRandom::constant(0.2));
        assert_eq!(play.outcome(), OutcomeCode::Macro(MacroOutcome::Dp));
        assert_eq!(play.outs(), 2);
        assert!(play.bases_after().is_empty());

        // 0.5 misses the DP and lands in the 65% batter-out branch
        let play = groundout(&input(Occupancy::FIRST, 0), &cfg, &mut ScriptedRandom::constant(0.5));
        assert_eq!(play.outcome(), OutcomeCode::Macro(MacroOutcome::Go));
        assert_eq!(play.bases_after().occupancy(), Occupancy::SECOND);
    }

    #[test]
    fn test_fielders_choice_label() {
        let cfg = RunningConfig::default();
        // miss the DP (0.9), then 0.9 lands in the force at second
        let play = groundout(&input(Occupancy::FIRST, 1), &cfg, &mut ScriptedRandom::constant(0.9));
        assert_eq!(play.outcome(), OutcomeCode::Macro(MacroOutcome::Fc));
        assert!(play.batter_reached());
        assert_eq!(play.bases_after().runner_on(First), Some(9));
    }

    #[test]
    fn test_corner_double_play_run_needs_nobody_out() {
        let none_out = double_play(&input(Occupancy::FIRST_THIRD, 0), &RunningConfig::default(), &mut ScriptedRandom::constant(0.5));
        assert_eq!(none_out.runs(), 1);
        assert!(none_out.bases_after().is_empty());

        let one_out = double_play(&input(Occupancy::FIRST_THIRD, 1), &RunningConfig::default(), &mut ScriptedRandom::constant(0.5));
        assert_eq!(one_out.runs(), 0);
        assert_eq!(one_out.bases_after().occupancy(), Occupancy::THIRD);
    }

    #[test]
    fn test_two_out_groundout_never_scores() {
        let cfg = RunningConfig::default();
        for occ in Occupancy::ALL {
            for draw in [0.0, 0.3, 0.7, 0.99] {
                let play = groundout(&input(occ, 2), &cfg, &mut ScriptedRandom::constant(draw));
                assert_eq!(play.runs(), 0);
                assert_eq!(play.outs(), 1);
            }
        }
    }

    #[test]
    fn test_double_play_resolver_falls_back_when_ineligible() {
        let play = double_play(&input(Occupancy::SECOND, 0), &RunningConfig::default(), &mut ScriptedRandom::constant(0.1));
        assert_eq!(play.outcome(), OutcomeCode::Macro(MacroOutcome::Go));
        assert_eq!(play.outs(), 1);
    }

    #[test]
    fn test_fielders_choice_resolver() {
        let cfg = RunningConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let play = fielders_choice(&input(Occupancy::LOADED, 0), &cfg, &mut rng);
        assert_eq!(play.runs(), 0);
        assert_eq!(play.bases_after().occupancy(), Occupancy::LOADED);
        assert_eq!(play.outs(), 1);

        let play = fielders_choice(&input(Occupancy::SECOND_THIRD, 0), &cfg, &mut rng);
        assert_eq!(play.bases_after().occupancy(), Occupancy::FIRST_SECOND);

        let play = fielders_choice(&input(Occupancy::EMPTY, 0), &cfg, &mut rng);
        assert_eq!(play.outcome(), OutcomeCode::Macro(MacroOutcome::Go));
        assert!(play.bases_after().is_empty());
    }
}
