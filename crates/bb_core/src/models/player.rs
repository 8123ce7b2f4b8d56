use serde::{Deserialize, Serialize};

use super::{PlayerId, RateTable};
use crate::error::{Result, SimError};

/// Batting side. `S` is a switch hitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bats {
    L,
    R,
    S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Throws {
    L,
    R,
}

impl Bats {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Bats::L),
            "R" => Ok(Bats::R),
            "S" | "B" => Ok(Bats::S),
            other => Err(SimError::InvalidConfig(format!("unknown batting side '{}'", other))),
        }
    }

    /// The side this batter actually stands on against `throws`.
    pub fn side_against(self, throws: Throws) -> Throws {
        match (self, throws) {
            (Bats::L, _) => Throws::L,
            (Bats::R, _) => Throws::R,
            (Bats::S, Throws::L) => Throws::R,
            (Bats::S, Throws::R) => Throws::L,
        }
    }
}

impl Throws {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Throws::L),
            "R" => Ok(Throws::R),
            other => Err(SimError::InvalidConfig(format!("unknown throwing arm '{}'", other))),
        }
    }
}

pub const DEFAULT_SPEED: u8 = 5;

/// A matchup participant. Rates are loaded once and never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team: String,
    pub first_name: String,
    pub last_name: String,
    pub bats: Bats,
    pub throws: Throws,
    #[serde(default)]
    pub batting: RateTable,
    #[serde(default)]
    pub pitching: RateTable,
    /// Baserunning speed, 1 (slowest) to 10.
    #[serde(default)]
    pub speed: Option<u8>,
    /// Spray/contact profile, 1 (ground-ball slap hitter) to 5 (fly-ball slugger).
    #[serde(default)]
    pub profile: Option<u8>,
}

impl Player {
    pub fn new(id: PlayerId, team: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            team: team.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            bats: Bats::R,
            throws: Throws::R,
            batting: RateTable::new(),
            pitching: RateTable::new(),
            speed: None,
            profile: None,
        }
    }

    pub fn with_hands(mut self, bats: Bats, throws: Throws) -> Self {
        self.bats = bats;
        self.throws = throws;
        self
    }

    pub fn with_batting(mut self, rates: RateTable) -> Self {
        self.batting = rates;
        self
    }

    pub fn with_pitching(mut self, rates: RateTable) -> Self {
        self.pitching = rates;
        self
    }

    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = Some(speed.clamp(1, 10));
        self
    }

    pub fn with_profile(mut self, profile: u8) -> Self {
        self.profile = Some(profile.clamp(1, 5));
        self
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn speed_or_default(&self) -> u8 {
        self.speed.unwrap_or(DEFAULT_SPEED)
    }

    pub fn validate_batting(&self) -> Result<()> {
        self.batting.validate_rates(self.id)
    }

    pub fn validate_pitching(&self) -> Result<()> {
        self.pitching.validate_rates(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RateKey;

    #[test]
    fn test_switch_hitter_bats_opposite_the_arm() {
        assert_eq!(Bats::S.side_against(Throws::L), Throws::R);
        assert_eq!(Bats::S.side_against(Throws::R), Throws::L);
        assert_eq!(Bats::L.side_against(Throws::L), Throws::L);
    }

    #[test]
    fn test_parse_hands() {
        assert_eq!(Bats::parse("b").unwrap(), Bats::S);
        assert_eq!(Throws::parse(" R ").unwrap(), Throws::R);
        assert!(Throws::parse("S").is_err());
    }

    #[test]
    fn test_validate_batting_missing_key() {
        let p = Player::new(12, "NYY", "Ada", "Lovelace")
            .with_batting(RateTable::new().with(RateKey::So, 0.2));
        assert!(matches!(
            p.validate_batting(),
            Err(SimError::MissingRate { player: 12, .. })
        ));
        assert_eq!(p.display_name(), "Ada Lovelace");
        assert_eq!(p.speed_or_default(), DEFAULT_SPEED);
    }
}
