//! Baserunning tuning.
//!
//! The per-occupancy groundout tables are fixed in the resolvers. The knobs
//! here are the scalar rates that presets are allowed to move.

use serde::{Deserialize, Serialize};

/// Per-depth per-mille values for tag-ups from third.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthTable {
    pub shallow: i32,
    pub medium: i32,
    /// Deep and extra-deep.
    pub deep: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunningConfig {
    // === Singles ===
    /// Runner on 2nd tries to score (default: 0.56)
    pub single_score_from_second: f64,
    /// Share of those attempts thrown out at home (default: 0.048)
    pub single_out_at_home: f64,
    /// Runner on 1st tries for 3rd when 2nd and 3rd clear (default: 0.33)
    pub single_first_to_third: f64,
    /// Share of those attempts thrown out at 3rd (default: 0.058)
    pub single_out_at_third: f64,

    // === Doubles ===
    /// Runner on 1st tries to score (default: 0.57)
    pub double_score_from_first: f64,
    /// Share of those attempts thrown out at home (default: 0.055)
    pub double_out_at_home: f64,

    // === Groundouts ===
    /// Double play branch with a runner on 1st and < 2 outs (default: 0.455)
    pub double_play_rate: f64,

    // === Tag-ups (per-mille) ===
    pub tag_attempt: DepthTable,
    pub tag_thrown_out: DepthTable,
    /// Attempt penalty with nobody out
    pub tag_zero_out_penalty: i32,
    /// CF/RF arms: attempt penalty and thrown-out bonus
    pub tag_strong_arm_attempt: i32,
    pub tag_strong_arm_out: i32,
    /// LF arm: attempt bonus and thrown-out reduction
    pub tag_weak_arm_attempt: i32,
    pub tag_weak_arm_out: i32,
    pub tag_speed_attempt_per_point: i32,
    pub tag_speed_out_per_point: i32,
    pub tag_aggression_per_point: i32,

    /// Team send aggression, 1..=10 (neutral 5)
    pub aggression: i32,

    // === Micro events ===
    /// Stolen base success given an attempt (default: 0.76)
    pub steal_success: f64,
    /// Pickoff success given an attempt (default: 0.02)
    pub pickoff_success: f64,
}

impl Default for RunningConfig {
    fn default() -> Self {
        Self {
            single_score_from_second: 0.56,
            single_out_at_home: 0.048,
            single_first_to_third: 0.33,
            single_out_at_third: 0.058,
            double_score_from_first: 0.57,
            double_out_at_home: 0.055,
            double_play_rate: 0.455,
            tag_attempt: DepthTable {
                shallow: 150,
                medium: 550,
                deep: 900,
            },
            tag_thrown_out: DepthTable {
                shallow: 350,
                medium: 150,
                deep: 50,
            },
            tag_zero_out_penalty: 100,
            tag_strong_arm_attempt: 100,
            tag_strong_arm_out: 80,
            tag_weak_arm_attempt: 100,
            tag_weak_arm_out: 50,
            tag_speed_attempt_per_point: 30,
            tag_speed_out_per_point: 25,
            tag_aggression_per_point: 40,
            aggression: 5,
            steal_success: 0.76,
            pickoff_success: 0.02,
        }
    }
}

impl RunningConfig {
    pub fn aggressive() -> Self {
        Self {
            single_score_from_second: 0.64,
            single_first_to_third: 0.40,
            double_score_from_first: 0.65,
            aggression: 7,
            ..Self::default()
        }
    }

    pub fn conservative() -> Self {
        Self {
            single_score_from_second: 0.48,
            single_first_to_third: 0.25,
            double_score_from_first: 0.48,
            aggression: 3,
            ..Self::default()
        }
    }

    /// Names and values of every probability field, for range checks.
    pub(crate) fn probabilities(&self) -> [(&'static str, f64); 9] {
        [
            ("single_score_from_second", self.single_score_from_second),
            ("single_out_at_home", self.single_out_at_home),
            ("single_first_to_third", self.single_first_to_third),
            ("single_out_at_third", self.single_out_at_third),
            ("double_score_from_first", self.double_score_from_first),
            ("double_out_at_home", self.double_out_at_home),
            ("double_play_rate", self.double_play_rate),
            ("steal_success", self.steal_success),
            ("pickoff_success", self.pickoff_success),
        ]
    }
}
