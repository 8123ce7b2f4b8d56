//! # Simulation configuration
//!
//! Every tunable rate the engine uses lives here, grouped by concern, with
//! presets for realistic, aggressive and conservative play.
//!
//! ```rust
//! use bb_core::engine::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let small_ball = SimConfig::aggressive();
//! let from_env = SimConfig::from_env_or_default();
//! ```
//!
//! ## Environment Variables
//!
//! - `BB_SIM_PROFILE`: Select preset (aggressive, conservative, default)

mod event_config;
mod platoon_config;
mod running_config;

pub use event_config::EventConfig;
pub use platoon_config::PlatoonConfig;
pub use running_config::{DepthTable, RunningConfig};

use std::env;

use serde::{Deserialize, Serialize};

use super::pitch_sequence::MAX_SEQUENCE_LEN;
use super::probability::CombineMethod;
use crate::error::{Result, SimError};

/// Smallest per-at-bat guard a legal at-bat fits under: the longest
/// sequence plus a micro event before every pitch but the last.
pub const MIN_PITCH_EVENTS_PER_AT_BAT: u32 = (2 * MAX_SEQUENCE_LEN - 1) as u32;

/// Runaway guards. Exceeding one is an internal invariant violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyLimits {
    pub max_pitches_per_at_bat: u32,
    pub max_plate_appearances_per_half: u32,
    pub max_innings: u32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_pitches_per_at_bat: 40,
            max_plate_appearances_per_half: 60,
            max_innings: 30,
        }
    }
}

/// Optional pre-generated draw pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub enabled: bool,
    /// Draws per stream; rounded up to a power of two.
    pub size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 1 << 16,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub combine: CombineMethod,
    pub platoon: PlatoonConfig,
    pub running: RunningConfig,
    pub events: EventConfig,
    pub limits: SafetyLimits,
    pub pool: PoolConfig,
}

impl SimConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// More sends on the bases, more running between pitches.
    pub fn aggressive() -> Self {
        let mut cfg = Self::default();
        cfg.running = RunningConfig::aggressive();
        cfg.events.steal_attempt = 0.055;
        cfg.events.pickoff_attempt = 0.02;
        cfg
    }

    /// Station-to-station baseball.
    pub fn conservative() -> Self {
        let mut cfg = Self::default();
        cfg.running = RunningConfig::conservative();
        cfg.events.steal_attempt = 0.018;
        cfg
    }

    /// No platoon noise and no micro events. Useful for reproducing distributions.
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.platoon.variability = false;
        cfg.events = EventConfig::disabled();
        cfg
    }

    pub fn from_env_or_default() -> Self {
        match env::var("BB_SIM_PROFILE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "aggressive" => Self::aggressive(),
            "conservative" => Self::conservative(),
            "deterministic" => Self::deterministic(),
            _ => Self::default(),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_yaml::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = self
            .running
            .probabilities()
            .into_iter()
            .chain(self.events.probabilities());
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.events.battery_rate() + self.events.pickoff_attempt + self.events.steal_attempt > 1.0 {
            return Err(SimError::InvalidConfig(
                "micro-event rates sum past 1.0".to_string(),
            ));
        }

        let p = &self.platoon;
        if !(0.0 <= p.strength_min && p.strength_min <= p.strength_max && p.strength_max <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "platoon strength range [{}, {}] must lie within [0, 1]",
                p.strength_min, p.strength_max
            )));
        }
        for (key, m) in p.favorable.iter().chain(p.unfavorable.iter()) {
            if !(m.is_finite() && m > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "platoon multiplier {} must be positive, got {}",
                    key, m
                )));
            }
        }

        if let CombineMethod::LogitBlend {
            batter_weight,
            pitcher_weight,
        } = self.combine
        {
            if !(batter_weight >= 0.0 && pitcher_weight >= 0.0 && batter_weight + pitcher_weight > 0.0) {
                return Err(SimError::InvalidConfig(
                    "logit blend weights must be non-negative and not both zero".to_string(),
                ));
            }
        }

        self.validate_tag_ups()?;

        let l = &self.limits;
        if l.max_pitches_per_at_bat < MIN_PITCH_EVENTS_PER_AT_BAT {
            return Err(SimError::InvalidConfig(format!(
                "max_pitches_per_at_bat must be at least {}, got {}",
                MIN_PITCH_EVENTS_PER_AT_BAT, l.max_pitches_per_at_bat
            )));
        }
        if l.max_plate_appearances_per_half < 3 || l.max_innings < 9 {
            return Err(SimError::InvalidConfig(
                "safety limits are below a legal game".to_string(),
            ));
        }
        if self.pool.enabled && self.pool.size == 0 {
            return Err(SimError::InvalidConfig("pool size must be > 0".to_string()));
        }
        Ok(())
    }

    fn validate_tag_ups(&self) -> Result<()> {
        let r = &self.running;
        if !(1..=10).contains(&r.aggression) {
            return Err(SimError::InvalidConfig(format!(
                "aggression must be within 1..=10, got {}",
                r.aggression
            )));
        }
        for (name, t) in [("tag_attempt", &r.tag_attempt), ("tag_thrown_out", &r.tag_thrown_out)] {
            for v in [t.shallow, t.medium, t.deep] {
                if !(0..=1000).contains(&v) {
                    return Err(SimError::InvalidConfig(format!(
                        "{} must be per-mille within 0..=1000, got {}",
                        name, v
                    )));
                }
            }
        }
        let a = &r.tag_attempt;
        if !(a.shallow <= a.medium && a.medium <= a.deep) {
            return Err(SimError::InvalidConfig(
                "tag_attempt must not fall as the fly gets deeper".to_string(),
            ));
        }
        let o = &r.tag_thrown_out;
        if !(o.shallow >= o.medium && o.medium >= o.deep) {
            return Err(SimError::InvalidConfig(
                "tag_thrown_out must not rise as the fly gets deeper".to_string(),
            ));
        }
        let adjustments = [
            ("tag_zero_out_penalty", r.tag_zero_out_penalty),
            ("tag_strong_arm_attempt", r.tag_strong_arm_attempt),
            ("tag_strong_arm_out", r.tag_strong_arm_out),
            ("tag_weak_arm_attempt", r.tag_weak_arm_attempt),
            ("tag_weak_arm_out", r.tag_weak_arm_out),
            ("tag_speed_attempt_per_point", r.tag_speed_attempt_per_point),
            ("tag_speed_out_per_point", r.tag_speed_out_per_point),
            ("tag_aggression_per_point", r.tag_aggression_per_point),
        ];
        for (name, v) in adjustments {
            if !(0..=1000).contains(&v) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be within 0..=1000, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.combine, CombineMethod::OddsRatio);
        assert!(cfg.platoon.enabled);
        assert!((cfg.running.double_play_rate - 0.455).abs() < 1e-12);
        assert!(!cfg.pool.enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for cfg in [
            SimConfig::realistic(),
            SimConfig::aggressive(),
            SimConfig::conservative(),
            SimConfig::deterministic(),
        ] {
            assert!(cfg.validate().is_ok());
        }
        assert!(SimConfig::aggressive().events.steal_attempt > SimConfig::conservative().events.steal_attempt);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
combine:
  method: logit_blend
  batter_weight: 0.6
  pitcher_weight: 0.4
running:
  aggression: 9
pool:
  enabled: true
  size: 4096
"#;
        let cfg = SimConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            cfg.combine,
            CombineMethod::LogitBlend {
                batter_weight: 0.6,
                pitcher_weight: 0.4
            }
        );
        assert_eq!(cfg.running.aggression, 9);
        assert!(cfg.pool.enabled);
        assert_eq!(cfg.events.steal_attempt, 0.035);
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let json = r#"{"running": {"steal_success": 1.4}}"#;
        let err = SimConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(ref m) if m.contains("steal_success")));
    }

    #[test]
    fn test_bad_platoon_range_rejected() {
        let mut cfg = SimConfig::default();
        cfg.platoon.strength_min = 0.9;
        cfg.platoon.strength_max = 0.4;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_pitch_limit_covers_longest_at_bat() {
        assert!(SimConfig::default().limits.max_pitches_per_at_bat >= MIN_PITCH_EVENTS_PER_AT_BAT);

        let mut cfg = SimConfig::default();
        cfg.limits.max_pitches_per_at_bat = 20;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(ref m) if m.contains("max_pitches_per_at_bat")));

        cfg.limits.max_pitches_per_at_bat = MIN_PITCH_EVENTS_PER_AT_BAT;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_tag_tables_validated() {
        let mut cfg = SimConfig::default();
        cfg.running.tag_attempt.deep = 1200;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(ref m)) if m.contains("tag_attempt")));

        let mut cfg = SimConfig::default();
        cfg.running.tag_attempt = DepthTable {
            shallow: 900,
            medium: 550,
            deep: 150,
        };
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(ref m)) if m.contains("deeper")));

        let mut cfg = SimConfig::default();
        cfg.running.tag_thrown_out = DepthTable {
            shallow: 50,
            medium: 150,
            deep: 350,
        };
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(ref m)) if m.contains("tag_thrown_out")));

        let mut cfg = SimConfig::default();
        cfg.running.tag_speed_out_per_point = -25;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_aggression_range() {
        for (aggression, ok) in [(0, false), (1, true), (10, true), (11, false)] {
            let mut cfg = SimConfig::default();
            cfg.running.aggression = aggression;
            assert_eq!(cfg.validate().is_ok(), ok, "aggression {}", aggression);
        }
        let err = SimConfig::from_yaml_str("running:\n  aggression: 14\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = SimConfig::from_yaml_str("running: [1, 2").unwrap_err();
        assert!(err.is_configuration());
    }
}
