//! Outcome probability vector for one matchup.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::PlatoonConfig;
use super::outcome::MacroOutcome;
use super::probability::{clamp_unit, fly_rate, CombineMethod, PlatoonAdjustment};
use crate::error::{Result, SimError};
use crate::models::{LeagueContext, ParkFactors, Player, RateKey, RateTable};

/// Fixed split of airborne outs into fly / line / pop.
pub const FLY_SPLIT: [f64; 3] = [0.56, 0.26, 0.18];

const BASE_KEYS: [RateKey; 4] = [RateKey::So, RateKey::Bb, RateKey::Hp, RateKey::Hr];
const HIT_KEYS: [RateKey; 4] = [RateKey::Ih, RateKey::Sl, RateKey::Dl, RateKey::Tl];
const OUT_KEYS: [RateKey; 4] = [RateKey::Go, RateKey::Fo, RateKey::Lo, RateKey::Po];

/// Tolerance for sub-distribution sums.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Probabilities for one plate appearance.
///
/// * `base`: SO, BB, HP, HR. Sum is at most 1; the rest is ball in play.
/// * `hits`: IH, SL, DL, TL given a hit on a ball in play. Sums to 1.
/// * `outs`: GO, FO, LO, PO given an out on a ball in play. Sums to 1.
/// * `babip`: hit-vs-out threshold on a ball in play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilityVector {
    base: [f64; 4],
    hits: [f64; 4],
    outs: [f64; 4],
    babip: f64,
}

impl OutcomeProbabilityVector {
    /// Builds a vector from raw parts, clamping and normalizing as needed.
    pub fn from_parts(base: [f64; 4], hits: [f64; 4], outs: [f64; 4], babip: f64) -> Self {
        let mut v = Self {
            base: base.map(clamp_unit),
            hits: hits.map(clamp_unit),
            outs: outs.map(clamp_unit),
            babip: clamp_unit(babip),
        };
        v.normalize();
        v
    }

    pub fn base(&self) -> &[f64; 4] {
        &self.base
    }

    pub fn hits(&self) -> &[f64; 4] {
        &self.hits
    }

    pub fn outs(&self) -> &[f64; 4] {
        &self.outs
    }

    pub fn babip(&self) -> f64 {
        self.babip
    }

    /// Mass left after SO/BB/HP/HR.
    pub fn ball_in_play(&self) -> f64 {
        (1.0 - self.base.iter().sum::<f64>()).max(0.0)
    }

    /// Unconditional probability of `outcome` in a plate appearance.
    /// `DP` and `FC` are not sampled directly and report 0.
    pub fn get(&self, outcome: MacroOutcome) -> f64 {
        let bip = self.ball_in_play();
        let pos = |list: &[MacroOutcome; 4]| list.iter().position(|m| *m == outcome);
        if let Some(i) = pos(&MacroOutcome::BASE) {
            self.base[i]
        } else if let Some(i) = pos(&MacroOutcome::HITS) {
            bip * self.babip * self.hits[i]
        } else if let Some(i) = pos(&MacroOutcome::OUTS) {
            bip * (1.0 - self.babip) * self.outs[i]
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut all = self
            .base
            .iter()
            .chain(self.hits.iter())
            .chain(self.outs.iter())
            .chain(std::iter::once(&self.babip));
        if all.any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
            return Err(SimError::InvariantViolation(format!(
                "probability out of range in {:?}",
                self
            )));
        }
        let base_sum: f64 = self.base.iter().sum();
        let hit_sum: f64 = self.hits.iter().sum();
        let out_sum: f64 = self.outs.iter().sum();
        if base_sum > 1.0 + SUM_TOLERANCE
            || (hit_sum - 1.0).abs() > SUM_TOLERANCE
            || (out_sum - 1.0).abs() > SUM_TOLERANCE
        {
            return Err(SimError::InvariantViolation(format!(
                "unnormalized vector: base {:.6} hits {:.6} outs {:.6}",
                base_sum, hit_sum, out_sum
            )));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let base_sum: f64 = self.base.iter().sum();
        if base_sum > 1.0 {
            warn!(base_sum, "base outcomes exceed 1.0, scaling down");
            for p in self.base.iter_mut() {
                *p /= base_sum;
            }
        }
        normalize_group(&mut self.hits, "hit types");
        normalize_group(&mut self.outs, "out types");
    }
}

/// Normalizes to sum 1. An all-zero group becomes uniform.
fn normalize_group(group: &mut [f64; 4], label: &str) {
    let sum: f64 = group.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        warn!(group = label, sum, "degenerate sub-distribution, falling back to uniform");
        *group = [0.25; 4];
        return;
    }
    for p in group.iter_mut() {
        *p /= sum;
    }
}

/// Everything around the two players that shapes a matchup.
#[derive(Debug, Clone, Copy)]
pub struct MatchupContext<'a> {
    pub league: &'a LeagueContext,
    pub park: &'a ParkFactors,
    pub method: CombineMethod,
    pub platoon: Option<(&'a PlatoonConfig, PlatoonAdjustment)>,
}

impl<'a> MatchupContext<'a> {
    /// Odds-ratio method, no platoon effect.
    pub fn neutral(league: &'a LeagueContext, park: &'a ParkFactors) -> Self {
        Self {
            league,
            park,
            method: CombineMethod::OddsRatio,
            platoon: None,
        }
    }
}

fn league_rate(league: &LeagueContext, key: RateKey) -> Result<f64> {
    league
        .rates
        .get(key)
        .ok_or_else(|| SimError::InvalidConfig(format!("league rates missing {}", key)))
}

/// Builds the outcome vector for `batter` facing `pitcher`.
///
/// Missing batter, pitcher or league rates are configuration errors.
/// Context multipliers apply league → park → platoon, clamping after each stage.
pub fn build_outcome_vector(
    batter: &Player,
    pitcher: &Player,
    ctx: &MatchupContext<'_>,
) -> Result<OutcomeProbabilityVector> {
    let combined = |key: RateKey| -> Result<f64> {
        let b = batter.batting.require(batter.id, key)?;
        let p = pitcher.pitching.require(pitcher.id, key)?;
        let l = league_rate(ctx.league, key)?;
        Ok(ctx.method.combine(b, p, l))
    };

    let mut base = [0.0; 4];
    for (slot, key) in base.iter_mut().zip(BASE_KEYS) {
        *slot = combined(key)?;
    }
    let mut hits = [0.0; 4];
    for (slot, key) in hits.iter_mut().zip(HIT_KEYS) {
        *slot = combined(key)?;
    }
    normalize_group(&mut hits, "hit types");

    let fly = ctx.method.combine(
        fly_rate(batter.batting.require(batter.id, RateKey::GbFb)?),
        fly_rate(pitcher.pitching.require(pitcher.id, RateKey::GbFb)?),
        fly_rate(league_rate(ctx.league, RateKey::GbFb)?),
    );
    let mut outs = [
        1.0 - fly,
        fly * FLY_SPLIT[0],
        fly * FLY_SPLIT[1],
        fly * FLY_SPLIT[2],
    ];
    let mut babip = combined(RateKey::Babip)?;

    let method = ctx.method;
    let mut apply_stage = |factor: &dyn Fn(RateKey) -> f64| {
        for (p, key) in base.iter_mut().zip(BASE_KEYS) {
            *p = method.apply_factor(*p, factor(key));
        }
        for (p, key) in hits.iter_mut().zip(HIT_KEYS) {
            *p = method.apply_factor(*p, factor(key));
        }
        for (p, key) in outs.iter_mut().zip(OUT_KEYS) {
            *p = method.apply_factor(*p, factor(key));
        }
        babip = method.apply_factor(babip, factor(RateKey::Babip));
    };

    apply_stage(&|k: RateKey| table_factor(&ctx.league.factors, k));
    apply_stage(&|k: RateKey| table_factor(&ctx.park.factors, k));
    if let Some((cfg, adj)) = ctx.platoon {
        apply_stage(&|k: RateKey| adj.multiplier(cfg, k));
    }

    Ok(OutcomeProbabilityVector::from_parts(base, hits, outs, babip))
}

fn table_factor(table: &RateTable, key: RateKey) -> f64 {
    table.factor_or_one(key)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn table(v: &[f64; 10]) -> RateTable {
        RateTable::from_pairs(&[
            (RateKey::So, v[0]),
            (RateKey::Bb, v[1]),
            (RateKey::Hp, v[2]),
            (RateKey::Hr, v[3]),
            (RateKey::Ih, v[4]),
            (RateKey::Sl, v[5]),
            (RateKey::Dl, v[6]),
            (RateKey::Tl, v[7]),
            (RateKey::Babip, v[8]),
            (RateKey::GbFb, v[9] * 4.0),
        ])
    }

    proptest! {
        /// Property: sub-distributions always sum to one
        #[test]
        fn prop_vector_normalized(
            b in prop::array::uniform10(0.0f64..=1.0),
            p in prop::array::uniform10(0.0f64..=1.0),
            l in prop::array::uniform10(0.0f64..=1.0),
            park_hr in 0.0f64..3.0,
            park_go in 0.0f64..3.0,
        ) {
            let batter = Player::new(1, "A", "a", "b").with_batting(table(&b));
            let pitcher = Player::new(2, "B", "c", "d").with_pitching(table(&p));
            let league = LeagueContext::new(table(&l));
            let mut park = ParkFactors::neutral("A");
            park.factors.set(RateKey::Hr, park_hr);
            park.set_gbfb_factor(park_go);

            let v = build_outcome_vector(&batter, &pitcher, &MatchupContext::neutral(&league, &park)).unwrap();
            prop_assert!((v.hits().iter().sum::<f64>() - 1.0).abs() < SUM_TOLERANCE);
            prop_assert!((v.outs().iter().sum::<f64>() - 1.0).abs() < SUM_TOLERANCE);
            prop_assert!(v.base().iter().sum::<f64>() <= 1.0 + SUM_TOLERANCE);
            prop_assert!(v.validate().is_ok());
        }
    }
}
