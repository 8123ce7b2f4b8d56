//! Strikeouts and outs in the air.
//!
//! Runners hold on strikeouts and popups. On fly and line outs caught in the
//! outfield with fewer than two outs, the runner on third decides whether to
//! tag: hold, tag and score, or tag and get thrown out.

use super::PlayInput;
use crate::engine::bases::Base;
use crate::engine::batted_ball::{ArmClass, Depth, Position};
use crate::engine::config::{DepthTable, RunningConfig};
use crate::engine::outcome::MacroOutcome;
use crate::engine::play::PlayResult;
use crate::engine::rng::RandomSource;

pub fn strikeout(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::So);
    b.batter_retired();
    b.finish()
}

pub fn popout(input: &PlayInput, _: &RunningConfig, _: &mut dyn RandomSource) -> PlayResult {
    let mut b = input.builder(MacroOutcome::Po);
    b.batter_retired();
    b.finish()
}

pub fn flyout(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    air_out(MacroOutcome::Fo, input, cfg, rng)
}

pub fn lineout(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> PlayResult {
    air_out(MacroOutcome::Lo, input, cfg, rng)
}

/// Tag-up decision for the runner on third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagUp {
    Hold,
    Safe,
    ThrownOut,
}

fn by_depth(table: &DepthTable, depth: Depth) -> i32 {
    match depth {
        Depth::Shallow => table.shallow,
        Depth::Medium => table.medium,
        Depth::Deep | Depth::ExtraDeep => table.deep,
    }
}

/// Per-mille chance the runner on third goes.
pub fn tag_attempt_per_mille(cfg: &RunningConfig, depth: Depth, fielder: Position, outs_before: u8, speed: u8) -> i32 {
    let mut pm = by_depth(&cfg.tag_attempt, depth);
    if outs_before == 0 {
        pm -= cfg.tag_zero_out_penalty;
    }
    match fielder.arm() {
        ArmClass::Strong => pm -= cfg.tag_strong_arm_attempt,
        ArmClass::Weak => pm += cfg.tag_weak_arm_attempt,
        ArmClass::Neutral => {}
    }
    pm += (i32::from(speed) - 5) * cfg.tag_speed_attempt_per_point;
    pm += (cfg.aggression - 5) * cfg.tag_aggression_per_point;
    pm.clamp(50, 1000)
}

/// Per-mille chance a tagging runner is thrown out at home.
pub fn tag_thrown_out_per_mille(cfg: &RunningConfig, depth: Depth, fielder: Position, speed: u8) -> i32 {
    let mut pm = by_depth(&cfg.tag_thrown_out, depth);
    match fielder.arm() {
        ArmClass::Strong => pm += cfg.tag_strong_arm_out,
        ArmClass::Weak => pm -= cfg.tag_weak_arm_out,
        ArmClass::Neutral => {}
    }
    pm -= (i32::from(speed) - 5) * cfg.tag_speed_out_per_point;
    pm.clamp(20, 500)
}

pub fn decide_tag_up(input: &PlayInput, cfg: &RunningConfig, rng: &mut dyn RandomSource) -> TagUp {
    if input.outs_before >= 2 || !input.bases.is_occupied(Base::Third) {
        return TagUp::Hold;
    }
    let (depth, fielder) = input
        .batted_ball
        .map(|bb| (bb.depth, bb.fielder))
        .unwrap_or((Depth::Medium, Position::CenterField));
    if !fielder.is_outfield() {
        return TagUp::Hold;
    }

    let speed = input.speed_on(Base::Third);
    let attempt = tag_attempt_per_mille(cfg, depth, fielder, input.outs_before, speed);
    if rng.per_mille() as i32 >= attempt {
        return TagUp::Hold;
    }
    let thrown_out = tag_thrown_out_per_mille(cfg, depth, fielder, speed);
    if (rng.per_mille() as i32) < thrown_out {
        TagUp::ThrownOut
    } else {
        TagUp::Safe
    }
}

fn air_out(
    outcome: MacroOutcome,
    input: &PlayInput,
    cfg: &RunningConfig,
    rng: &mut dyn RandomSource,
) -> PlayResult {
    let mut b = input.builder(outcome);
    b.batter_retired();
    match decide_tag_up(input, cfg, rng) {
        TagUp::Hold => {}
        TagUp::Safe => {
            b.score(Base::Third);
        }
        TagUp::ThrownOut => {
            b.put_out(Base::Third, Base::Home);
        }
    }
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bases::{BaseState, Occupancy};
    use crate::engine::batted_ball::{BallKind, BattedBall, Sector};
    use crate::engine::rng::ScriptedRandom;

    fn fly(depth: Depth, fielder: Position) -> Option<BattedBall> {
        Some(BattedBall {
            kind: BallKind::Fly,
            sector: Sector::Center,
            depth,
            fielder,
        })
    }

    fn input(occ: Occupancy, outs: u8, depth: Depth, fielder: Position) -> PlayInput {
        PlayInput::new(BaseState::with_occupancy(occ), 9, outs).with_batted_ball(fly(depth, fielder))
    }

    #[test]
    fn test_strikeout_and_popout_hold_runners() {
        for occ in Occupancy::ALL {
            let i = PlayInput::new(BaseState::with_occupancy(occ), 9, 0);
            for play in [
                strikeout(&i, &RunningConfig::default(), &mut ScriptedRandom::constant(0.0)),
                popout(&i, &RunningConfig::default(), &mut ScriptedRandom::constant(0.0)),
            ] {
                assert_eq!(play.outs(), 1);
                assert_eq!(play.runs(), 0);
                assert_eq!(play.bases_after(), play.bases_before());
                assert!(play.check_conservation().is_ok());
            }
        }
    }

    #[test]
    fn test_attempt_table() {
        let cfg = RunningConfig::default();
        // deep to center, one out, average runner: 900 - 100
        assert_eq!(tag_attempt_per_mille(&cfg, Depth::Deep, Position::CenterField, 1, 5), 800);
        // shallow to right with nobody out: 150 - 100 - 100 clamps to 50
        assert_eq!(tag_attempt_per_mille(&cfg, Depth::Shallow, Position::RightField, 0, 5), 50);
        // medium to left, fast runner: 550 + 100 + 4 * 30
        assert_eq!(tag_attempt_per_mille(&cfg, Depth::Medium, Position::LeftField, 1, 9), 770);
        // extra deep to left with a burner: clamps to 1000
        assert_eq!(tag_attempt_per_mille(&cfg, Depth::ExtraDeep, Position::LeftField, 1, 10), 1000);
    }

    #[test]
    fn test_thrown_out_table() {
        let cfg = RunningConfig::default();
        assert_eq!(tag_thrown_out_per_mille(&cfg, Depth::Shallow, Position::RightField, 5), 430);
        assert_eq!(tag_thrown_out_per_mille(&cfg, Depth::Deep, Position::LeftField, 5), 20);
        assert_eq!(tag_thrown_out_per_mille(&cfg, Depth::Medium, Position::CenterField, 1), 330);
    }

    #[test]
    fn test_deep_fly_scores_runner() {
        let cfg = RunningConfig::default();
        // attempt roll 100 < 800, thrown-out roll 900 >= 130
        let mut rng = ScriptedRandom::new(&[0.1, 0.9]);
        let play = flyout(&input(Occupancy::THIRD, 1, Depth::Deep, Position::CenterField), &cfg, &mut rng);
        assert_eq!(play.runs(), 1);
        assert_eq!(play.outs(), 1);
        assert!(play.bases_after().is_empty());
    }

    #[test]
    fn test_tagging_runner_thrown_out() {
        let cfg = RunningConfig::default();
        let mut rng = ScriptedRandom::new(&[0.1, 0.05]);
        let play = lineout(&input(Occupancy::FIRST_THIRD, 0, Depth::Deep, Position::RightField), &cfg, &mut rng);
        assert_eq!(play.runs(), 0);
        assert_eq!(play.outs(), 2);
        assert_eq!(play.bases_after().occupancy(), Occupancy::FIRST);
        assert!(play.check_conservation().is_ok());
    }

    #[test]
    fn test_two_outs_runner_holds() {
        let cfg = RunningConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let play = flyout(&input(Occupancy::THIRD, 2, Depth::ExtraDeep, Position::LeftField), &cfg, &mut rng);
        assert_eq!(play.runs(), 0);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_infield_liner_no_tag() {
        let cfg = RunningConfig::default();
        let mut i = input(Occupancy::THIRD, 0, Depth::Shallow, Position::Shortstop);
        i.batted_ball = i.batted_ball.map(|mut bb| {
            bb.kind = BallKind::Liner;
            bb
        });
        assert_eq!(decide_tag_up(&i, &cfg, &mut ScriptedRandom::constant(0.0)), TagUp::Hold);
    }
}
