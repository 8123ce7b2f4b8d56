//! Handedness split multipliers.

use serde::{Deserialize, Serialize};

use crate::models::{RateKey, RateTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatoonConfig {
    pub enabled: bool,
    /// Draw a strength per matchup; off means full strength always.
    pub variability: bool,
    pub strength_min: f64,
    pub strength_max: f64,
    /// Applied when the batter has the platoon advantage.
    pub favorable: RateTable,
    /// Applied for same-handed matchups.
    pub unfavorable: RateTable,
}

impl Default for PlatoonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            variability: true,
            strength_min: 0.5,
            strength_max: 1.0,
            favorable: RateTable::from_pairs(&[
                (RateKey::So, 0.92),
                (RateKey::Bb, 1.08),
                (RateKey::Hr, 1.10),
                (RateKey::Sl, 1.04),
                (RateKey::Dl, 1.06),
                (RateKey::Tl, 1.05),
                (RateKey::Babip, 1.02),
            ]),
            unfavorable: RateTable::from_pairs(&[
                (RateKey::So, 1.09),
                (RateKey::Bb, 0.93),
                (RateKey::Hr, 0.90),
                (RateKey::Sl, 0.97),
                (RateKey::Dl, 0.95),
                (RateKey::Tl, 0.95),
                (RateKey::Babip, 0.98),
            ]),
        }
    }
}

impl PlatoonConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Wider splits.
    pub fn pronounced() -> Self {
        let scale = |table: &RateTable| -> RateTable {
            table.iter().map(|(k, m)| (k, 1.0 + (m - 1.0) * 1.5)).collect()
        };
        let base = Self::default();
        Self {
            favorable: scale(&base.favorable),
            unfavorable: scale(&base.unfavorable),
            ..base
        }
    }
}
