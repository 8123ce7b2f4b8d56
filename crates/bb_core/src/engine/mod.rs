pub mod at_bat; // plate appearance: matchup, pitches, micro events, resolution
pub mod bases;
pub mod batted_ball; // batted-ball type, spray sector, depth, fielder
pub mod config;
pub mod distribution; // outcome probability vector
pub mod game; // half-innings, game loop, line score
pub mod outcome;
pub mod pitch_sequence; // count-aware Markov pitch sequences
pub mod play;
pub mod probability; // odds ratio, logit blend, platoon
pub mod resolvers;
pub mod rng;
pub mod sampler;
pub mod series; // parallel series runner

pub use at_bat::{AtBatDriver, AtBatResult, Situation};
pub use bases::{Base, BaseState, Occupancy};
pub use config::SimConfig;
pub use distribution::{build_outcome_vector, MatchupContext, OutcomeProbabilityVector};
pub use game::{GameSimulator, GameState, GameSummary, Team};
pub use outcome::{MacroOutcome, MicroEvent, OutcomeCode, PitchCode};
pub use play::{PlayBuilder, PlayResult, RunnerDisposition};
pub use resolvers::{resolve, PlayInput, ResolverRegistry};
pub use rng::{GameRng, RandomSource};
pub use sampler::sample_outcome;
pub use series::{simulate_series, SeriesSummary};
