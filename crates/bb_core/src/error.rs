use thiserror::Error;

use crate::engine::outcome::OutcomeCode;
use crate::models::{PlayerId, RateKey};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Unknown outcome code: {0}")]
    UnknownOutcome(String),

    #[error("No resolver registered for outcome {0}")]
    NoResolver(OutcomeCode),

    #[error("Player {player} is missing required rate {key}")]
    MissingRate { player: PlayerId, key: RateKey },

    #[error("Player {player} has invalid rate {key} = {value}")]
    InvalidRate {
        player: PlayerId,
        key: RateKey,
        value: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid lineup for {team}: {reason}")]
    InvalidLineup { team: String, reason: String },

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl SimError {
    /// Data or wiring defects upstream of the engine. These abort the game.
    pub fn is_configuration(&self) -> bool {
        match self {
            SimError::UnknownOutcome(_) => true,
            SimError::NoResolver(_) => true,
            SimError::MissingRate { .. } => true,
            SimError::InvalidRate { .. } => true,
            SimError::InvalidConfig(_) => true,
            SimError::InvalidLineup { .. } => true,
            SimError::InvariantViolation(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::outcome::MacroOutcome;

    #[test]
    fn test_error_messages_carry_identifiers() {
        let err = SimError::MissingRate {
            player: 7,
            key: RateKey::Hr,
        };
        assert_eq!(err.to_string(), "Player 7 is missing required rate HR");

        let err = SimError::NoResolver(OutcomeCode::Macro(MacroOutcome::Dp));
        assert!(err.to_string().contains("DP"));
    }

    #[test]
    fn test_configuration_classification() {
        assert!(SimError::UnknownOutcome("ZZ".into()).is_configuration());
        assert!(!SimError::InvariantViolation("runaway".into()).is_configuration());
    }
}
