use serde::{Deserialize, Serialize};

use super::{RateKey, RateTable};

/// League-wide baseline.
///
/// `rates` are the league-average probabilities every odds ratio is measured
/// against. `factors` are multiplicative regression adjustments applied to all
/// matchups in the league (absent keys are neutral).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueContext {
    #[serde(default)]
    pub year: Option<u16>,
    pub rates: RateTable,
    #[serde(default)]
    pub factors: RateTable,
}

impl LeagueContext {
    pub fn new(rates: RateTable) -> Self {
        Self {
            year: None,
            rates,
            factors: RateTable::new(),
        }
    }

    pub fn with_factors(mut self, factors: RateTable) -> Self {
        self.factors = factors;
        self
    }

    /// Roughly a modern major-league season. Used by tests and demos.
    pub fn modern() -> Self {
        Self::new(RateTable::from_pairs(&[
            (RateKey::So, 0.22),
            (RateKey::Bb, 0.085),
            (RateKey::Hp, 0.011),
            (RateKey::Hr, 0.031),
            (RateKey::Ih, 0.025),
            (RateKey::Sl, 0.14),
            (RateKey::Dl, 0.045),
            (RateKey::Tl, 0.004),
            (RateKey::Babip, 0.295),
            (RateKey::GbFb, 1.05),
        ]))
    }
}

/// Home-park multipliers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParkFactors {
    pub team: String,
    #[serde(default)]
    pub stadium: String,
    #[serde(default)]
    pub factors: RateTable,
}

impl ParkFactors {
    pub fn neutral(team: &str) -> Self {
        Self {
            team: team.to_string(),
            stadium: String::new(),
            factors: RateTable::new(),
        }
    }

    /// A ground-ball/fly-ball park factor expands to the out types: grounders
    /// scale by `f`, airborne outs by `1/f`.
    pub fn set_gbfb_factor(&mut self, f: f64) {
        if !(f.is_finite() && f > 0.0) {
            return;
        }
        self.factors.set(RateKey::Go, f);
        for key in [RateKey::Fo, RateKey::Lo, RateKey::Po] {
            self.factors.set(key, 1.0 / f);
        }
    }
}
