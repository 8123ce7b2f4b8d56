//! Walks and hit batsmen: forced advances only, no randomness.

use super::PlayInput;
use crate::engine::config::RunningConfig;
use crate::engine::outcome::MacroOutcome;
use crate::engine::play::PlayResult;
use crate::engine::rng::RandomSource;

pub fn walk(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Bb);
    b.force_advance();
    b.finish()
}

pub fn hit_by_pitch(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Hp);
    b.force_advance();
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bases::{Base, BaseState, Occupancy};
    use crate::engine::rng::ScriptedRandom;

    fn run(occ: Occupancy) -> PlayResult {
        let input = PlayInput::new(BaseState::with_occupancy(occ), 9, 0);
        walk(&input, &RunningConfig::default(), &mut ScriptedRandom::constant(0.5))
    }

    #[test]
    fn test_walk_bases_loaded_forces_in_run() {
        let play = run(Occupancy::LOADED);
        assert_eq!(play.runs(), 1);
        assert_eq!(play.outs(), 0);
        let after = play.bases_after();
        assert_eq!(after.occupancy(), Occupancy::LOADED);
        assert_eq!(after.runner_on(Base::First), Some(9));
        assert_eq!(after.runner_on(Base::Second), Some(101));
        assert_eq!(after.runner_on(Base::Third), Some(102));
    }

    #[test]
    fn test_walk_empty_bases() {
        let play = run(Occupancy::EMPTY);
        assert_eq!(play.runs(), 0);
        assert_eq!(play.bases_after().occupancy(), Occupancy::FIRST);
        assert_eq!(play.bases_after().runner_on(Base::First), Some(9));
    }

    #[test]
    fn test_walk_only_forced_runners_move() {
        let expected = [
            (Occupancy::FIRST, Occupancy::FIRST_SECOND),
            (Occupancy::SECOND, Occupancy::FIRST_SECOND),
            (Occupancy::THIRD, Occupancy::FIRST_THIRD),
            (Occupancy::FIRST_SECOND, Occupancy::LOADED),
            (Occupancy::FIRST_THIRD, Occupancy::LOADED),
            (Occupancy::SECOND_THIRD, Occupancy::LOADED),
        ];
        for (before, after) in expected {
            let play = run(before);
            assert_eq!(play.bases_after().occupancy(), after, "from {}", before);
            assert_eq!(play.runs(), 0);
            assert!(play.check_conservation().is_ok());
        }
    }

    #[test]
    fn test_hit_by_pitch_uses_no_draws() {
        let mut rng = ScriptedRandom::constant(0.5);
        let input = PlayInput::new(BaseState::with_occupancy(Occupancy::FIRST_SECOND), 9, 1);
        let play = hit_by_pitch(&input, &RunningConfig::default(), &mut rng);
        assert_eq!(play.bases_after().occupancy(), Occupancy::LOADED);
        assert_eq!(play.hits(), 0);
        assert_eq!(rng.consumed(), 0);
    }
}
