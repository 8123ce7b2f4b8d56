//! Probability combination.
//!
//! Batter and pitcher rates are merged against the league baseline with the
//! odds-ratio method by default. The logit-weighted blend is available as a
//! whole-config switch; one method is used for every category of a matchup.

use serde::{Deserialize, Serialize};

use super::config::PlatoonConfig;
use super::rng::RandomSource;
use crate::models::{Bats, RateKey, Throws};

/// Inputs are clamped to `[EPSILON, 1 - EPSILON]` before conversion to odds.
pub const EPSILON: f64 = 1e-4;

#[inline]
pub fn clamp_rate(p: f64) -> f64 {
    if p.is_nan() {
        return EPSILON;
    }
    p.clamp(EPSILON, 1.0 - EPSILON)
}

#[inline]
pub fn clamp_unit(p: f64) -> f64 {
    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, 1.0)
}

#[inline]
fn to_odds(p: f64) -> f64 {
    p / (1.0 - p)
}

#[inline]
fn from_odds(odds: f64) -> f64 {
    clamp_unit(odds / (1.0 + odds))
}

#[inline]
fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

#[inline]
fn inv_logit(x: f64) -> f64 {
    clamp_unit(1.0 / (1.0 + (-x).exp()))
}

fn valid_modifier(m: f64) -> bool {
    m.is_finite() && m > 0.0
}

/// Odds-ratio combination.
///
/// `league_odds * (batter_odds / league_odds) * (pitcher_odds / league_odds)`,
/// converted back to a probability. League-average inputs reproduce the
/// league rate.
pub fn odds_ratio(batter: f64, pitcher: f64, league: f64) -> f64 {
    let league_odds = to_odds(clamp_rate(league));
    let batter_ratio = to_odds(clamp_rate(batter)) / league_odds;
    let pitcher_ratio = to_odds(clamp_rate(pitcher)) / league_odds;
    from_odds(league_odds * batter_ratio * pitcher_ratio)
}

/// Logit-weighted average with optional multiplicative modifiers.
///
/// Weights are normalized to sum to 1. Each positive finite modifier adds
/// `ln(m)` to the log-odds; zero, negative, NaN and infinite modifiers are
/// skipped.
pub fn logit_blend(
    batter: f64,
    pitcher: f64,
    batter_weight: f64,
    pitcher_weight: f64,
    modifiers: &[f64],
) -> f64 {
    let total = batter_weight + pitcher_weight;
    let (wb, wp) = if total > 0.0 && total.is_finite() {
        (batter_weight / total, pitcher_weight / total)
    } else {
        (0.5, 0.5)
    };
    let mut x = wb * logit(clamp_rate(batter)) + wp * logit(clamp_rate(pitcher));
    for m in modifiers.iter().copied().filter(|m| valid_modifier(*m)) {
        x += m.ln();
    }
    inv_logit(x)
}

/// Scales `p` by `m` and clamps to `[0, 1]`. Invalid multipliers leave `p` as is.
pub fn apply_multiplier(p: f64, m: f64) -> f64 {
    if valid_modifier(m) {
        clamp_unit(p * m)
    } else {
        clamp_unit(p)
    }
}

/// Adds `ln(m)` to the log-odds of `p`. Neutral or invalid multipliers leave `p` as is.
pub fn apply_logit_multiplier(p: f64, m: f64) -> f64 {
    if valid_modifier(m) && m != 1.0 {
        inv_logit(logit(clamp_rate(p)) + m.ln())
    } else {
        clamp_unit(p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CombineMethod {
    OddsRatio,
    LogitBlend {
        batter_weight: f64,
        pitcher_weight: f64,
    },
}

impl Default for CombineMethod {
    fn default() -> Self {
        CombineMethod::OddsRatio
    }
}

impl CombineMethod {
    pub fn logit_even() -> Self {
        CombineMethod::LogitBlend {
            batter_weight: 0.5,
            pitcher_weight: 0.5,
        }
    }

    /// Applies a context multiplier in this method's space: linear for the
    /// odds ratio, log-odds for the blend.
    pub fn apply_factor(&self, p: f64, m: f64) -> f64 {
        match self {
            CombineMethod::OddsRatio => apply_multiplier(p, m),
            CombineMethod::LogitBlend { .. } => apply_logit_multiplier(p, m),
        }
    }

    /// The blend ignores the league baseline.
    pub fn combine(&self, batter: f64, pitcher: f64, league: f64) -> f64 {
        match *self {
            CombineMethod::OddsRatio => odds_ratio(batter, pitcher, league),
            CombineMethod::LogitBlend {
                batter_weight,
                pitcher_weight,
            } => logit_blend(batter, pitcher, batter_weight, pitcher_weight, &[]),
        }
    }
}

/// Converts a ground-ball/fly-ball ratio into a fly-ball rate.
pub fn fly_rate(gbfb: f64) -> f64 {
    if !(gbfb.is_finite() && gbfb >= 0.0) {
        return 0.5;
    }
    1.0 / (1.0 + gbfb)
}

// ========== Platoon ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatoonSide {
    Favorable,
    Unfavorable,
}

/// Switch hitters always hold the advantage; otherwise same-handed is unfavorable.
pub fn platoon_side(bats: Bats, throws: Throws) -> PlatoonSide {
    match (bats, throws) {
        (Bats::S, _) => PlatoonSide::Favorable,
        (Bats::L, Throws::L) | (Bats::R, Throws::R) => PlatoonSide::Unfavorable,
        _ => PlatoonSide::Favorable,
    }
}

/// `1 + (m - 1) * strength`.
#[inline]
pub fn scale_multiplier(m: f64, strength: f64) -> f64 {
    1.0 + (m - 1.0) * strength
}

/// Platoon effect for one matchup. Strength is drawn once and applied to every key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatoonAdjustment {
    pub side: PlatoonSide,
    pub strength: f64,
}

impl PlatoonAdjustment {
    pub fn draw(
        bats: Bats,
        throws: Throws,
        cfg: &PlatoonConfig,
        rng: &mut dyn RandomSource,
    ) -> Option<Self> {
        if !cfg.enabled {
            return None;
        }
        let strength = if cfg.variability {
            cfg.strength_min + (cfg.strength_max - cfg.strength_min) * rng.next_uniform()
        } else {
            cfg.strength_max
        };
        Some(Self {
            side: platoon_side(bats, throws),
            strength,
        })
    }

    pub fn multiplier(&self, cfg: &PlatoonConfig, key: RateKey) -> f64 {
        let table = match self.side {
            PlatoonSide::Favorable => &cfg.favorable,
            PlatoonSide::Unfavorable => &cfg.unfavorable,
        };
        scale_multiplier(table.factor_or_one(key), self.strength)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: combination never leaves the unit interval
        #[test]
        fn prop_combine_in_bounds(
            b in 0.0f64..=1.0,
            p in 0.0f64..=1.0,
            l in 0.0f64..=1.0,
            wb in 0.0f64..2.0,
            wp in 0.01f64..2.0,
            m in -1.0f64..5.0,
        ) {
            let or = odds_ratio(b, p, l);
            prop_assert!((0.0..=1.0).contains(&or));
            let lb = logit_blend(b, p, wb, wp, &[m]);
            prop_assert!((0.0..=1.0).contains(&lb));
            prop_assert!((0.0..=1.0).contains(&apply_multiplier(b, m)));
        }

        /// Property: league-average inputs reproduce the league rate
        #[test]
        fn prop_odds_ratio_identity(l in 0.001f64..0.999) {
            prop_assert!((odds_ratio(l, l, l) - l).abs() < 1e-9);
        }
    }
}
