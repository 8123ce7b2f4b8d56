//! Per-pitch micro-event rates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Master switch; off means pitches never produce micro events.
    pub enabled: bool,
    /// Pickoff throw to first per pitch with a runner on 1st (default: 0.015)
    pub pickoff_attempt: f64,
    /// Steal of 2nd per pitch with 1st occupied and 2nd open (default: 0.035)
    pub steal_attempt: f64,
    pub wild_pitch: f64,
    pub passed_ball: f64,
    pub balk: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pickoff_attempt: 0.015,
            steal_attempt: 0.035,
            wild_pitch: 0.004,
            passed_ball: 0.0012,
            balk: 0.0005,
        }
    }
}

impl EventConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub(crate) fn probabilities(&self) -> [(&'static str, f64); 5] {
        [
            ("pickoff_attempt", self.pickoff_attempt),
            ("steal_attempt", self.steal_attempt),
            ("wild_pitch", self.wild_pitch),
            ("passed_ball", self.passed_ball),
            ("balk", self.balk),
        ]
    }

    /// Combined chance that a pitch produces a battery event (WP/PB/BK).
    pub fn battery_rate(&self) -> f64 {
        self.wild_pitch + self.passed_ball + self.balk
    }
}
