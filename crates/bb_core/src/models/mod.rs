//! Data model consumed by the engine: players, their rates, league and park context.

pub mod league;
pub mod player;
pub mod rates;

pub use league::{LeagueContext, ParkFactors};
pub use player::{Bats, Player, Throws, DEFAULT_SPEED};
pub use rates::{RateKey, RateTable};

/// Runner / player identity.
pub type PlayerId = u32;
