//! # bb_core - Deterministic Baseball Plate-Appearance Engine
//!
//! Turns a batter/pitcher matchup into a plate-appearance outcome and the
//! exact base-running consequences of it.
//!
//! ## Features
//! - Odds-ratio (or logit-blend) combination of batter, pitcher and league rates
//! - League, park and platoon context applied in stages
//! - Exact per-base-state outcome resolvers with runner conservation checks
//! - Pitch sequences and micro events (steals, pickoffs, wild pitches)
//! - Deterministic: same seed, same game

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// At-bat APIs take the whole matchup context
#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{
    build_outcome_vector, resolve, sample_outcome, simulate_series, AtBatDriver, Base, BaseState,
    GameRng, GameSimulator, GameSummary, MacroOutcome, MicroEvent, OutcomeCode,
    OutcomeProbabilityVector, PlayResult, RandomSource, ResolverRegistry, SeriesSummary,
    SimConfig, Team,
};
pub use error::{Result, SimError};
pub use models::{Bats, LeagueContext, ParkFactors, Player, PlayerId, RateKey, RateTable, Throws};

/// Engine version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
