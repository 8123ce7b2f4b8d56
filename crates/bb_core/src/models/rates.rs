//! Outcome-code keyed rate tables.
//!
//! Player rates, league averages, park factors and platoon multipliers all
//! share one flat representation: `RateKey -> f64`.

use std::fmt;
use std::str::FromStr;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::error::{Result, SimError};

/// Keys understood by the probability model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateKey {
    #[serde(rename = "SO")]
    So,
    #[serde(rename = "BB")]
    Bb,
    #[serde(rename = "HP")]
    Hp,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "IH")]
    Ih,
    #[serde(rename = "SL")]
    Sl,
    #[serde(rename = "DL")]
    Dl,
    #[serde(rename = "TL")]
    Tl,
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "FO")]
    Fo,
    #[serde(rename = "LO")]
    Lo,
    #[serde(rename = "PO")]
    Po,
    /// Batting average on balls in play.
    #[serde(rename = "BA")]
    Babip,
    /// Ground-ball / fly-ball ratio.
    #[serde(rename = "GBFB")]
    GbFb,
}

impl RateKey {
    pub const ALL: [RateKey; 14] = [
        RateKey::So,
        RateKey::Bb,
        RateKey::Hp,
        RateKey::Hr,
        RateKey::Ih,
        RateKey::Sl,
        RateKey::Dl,
        RateKey::Tl,
        RateKey::Go,
        RateKey::Fo,
        RateKey::Lo,
        RateKey::Po,
        RateKey::Babip,
        RateKey::GbFb,
    ];

    /// Keys a batter or pitcher must carry to build a matchup.
    pub const REQUIRED: [RateKey; 10] = [
        RateKey::So,
        RateKey::Bb,
        RateKey::Hp,
        RateKey::Hr,
        RateKey::Ih,
        RateKey::Sl,
        RateKey::Dl,
        RateKey::Tl,
        RateKey::Babip,
        RateKey::GbFb,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RateKey::So => "SO",
            RateKey::Bb => "BB",
            RateKey::Hp => "HP",
            RateKey::Hr => "HR",
            RateKey::Ih => "IH",
            RateKey::Sl => "SL",
            RateKey::Dl => "DL",
            RateKey::Tl => "TL",
            RateKey::Go => "GO",
            RateKey::Fo => "FO",
            RateKey::Lo => "LO",
            RateKey::Po => "PO",
            RateKey::Babip => "BA",
            RateKey::GbFb => "GBFB",
        }
    }

    /// GB/FB is a ratio, every other key is a probability.
    pub fn is_ratio(self) -> bool {
        matches!(self, RateKey::GbFb)
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RateKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        RateKey::ALL
            .iter()
            .copied()
            .find(|k| k.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::UnknownOutcome(s.to_string()))
    }
}

/// Flat `RateKey -> value` mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(FxHashMap<RateKey, f64>);

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(RateKey, f64)]) -> Self {
        pairs.iter().copied().collect()
    }

    pub fn with(mut self, key: RateKey, value: f64) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn set(&mut self, key: RateKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: RateKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn require(&self, player: PlayerId, key: RateKey) -> Result<f64> {
        self.get(key)
            .ok_or(SimError::MissingRate { player, key })
    }

    /// Multiplier lookup: absent keys are neutral.
    pub fn factor_or_one(&self, key: RateKey) -> f64 {
        self.get(key).unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RateKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Checks presence of every required key and the range of each value.
    pub fn validate_rates(&self, player: PlayerId) -> Result<()> {
        for key in RateKey::REQUIRED {
            let value = self.require(player, key)?;
            let in_range = if key.is_ratio() {
                value.is_finite() && value >= 0.0
            } else {
                (0.0..=1.0).contains(&value)
            };
            if !in_range {
                return Err(SimError::InvalidRate { player, key, value });
            }
        }
        Ok(())
    }
}

impl FromIterator<(RateKey, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (RateKey, f64)>>(iter: I) -> Self {
        RateTable(iter.into_iter().collect())
    }
}
