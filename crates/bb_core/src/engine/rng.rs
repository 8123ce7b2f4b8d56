//! Deterministic random sources.
//!
//! Every draw the engine makes goes through [`RandomSource`]. A game owns a
//! [`GameRng`] with one independent ChaCha8 stream per purpose, so reordering
//! draws in one concern (say, micro events) never shifts another (outcome
//! sampling). Streams may optionally be backed by a pre-generated
//! [`DrawPool`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::PoolConfig;

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_uniform() < p
    }

    /// Per-mille roll in `0..1000`.
    fn per_mille(&mut self) -> u32 {
        ((self.next_uniform() * 1000.0) as u32).min(999)
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Pre-generated pool of uniform draws.
///
/// The pool wraps instead of running dry. Each lap walks the buffer with a
/// fresh odd stride and offset; with a power-of-two length an odd stride
/// visits every slot exactly once, so a lap is a permutation of the pool and
/// consecutive laps do not replay the same sequence.
#[derive(Debug, Clone)]
pub struct DrawPool {
    draws: Vec<f64>,
    mask: usize,
    cursor: usize,
    stride: usize,
    offset: usize,
    laps: u64,
    reshuffle: ChaCha8Rng,
}

impl DrawPool {
    /// `size` is rounded up to a power of two (minimum 2).
    pub fn new(seed: u64, stream: u64, size: usize) -> Self {
        let len = size.max(2).next_power_of_two();
        let mut fill = ChaCha8Rng::seed_from_u64(seed);
        fill.set_stream(stream);
        let draws = (0..len).map(|_| fill.gen::<f64>()).collect();

        let mut reshuffle = ChaCha8Rng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
        reshuffle.set_stream(stream);

        Self {
            draws,
            mask: len - 1,
            cursor: 0,
            stride: 1,
            offset: 0,
            laps: 0,
            reshuffle,
        }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Completed passes over the pool.
    pub fn laps(&self) -> u64 {
        self.laps
    }

    fn start_next_lap(&mut self) {
        self.laps += 1;
        self.cursor = 0;
        self.stride = (self.reshuffle.gen::<usize>() & self.mask) | 1;
        self.offset = self.reshuffle.gen::<usize>() & self.mask;
    }
}

impl RandomSource for DrawPool {
    fn next_uniform(&mut self) -> f64 {
        if self.cursor > self.mask {
            self.start_next_lap();
        }
        let idx = self.offset.wrapping_add(self.cursor.wrapping_mul(self.stride)) & self.mask;
        self.cursor += 1;
        self.draws[idx]
    }
}

/// A live generator or a pool.
#[derive(Debug, Clone)]
pub enum Stream {
    Live(ChaCha8Rng),
    Pooled(DrawPool),
}

impl Stream {
    pub fn new(seed: u64, stream: u64, pool: &PoolConfig) -> Self {
        if pool.enabled {
            Stream::Pooled(DrawPool::new(seed, stream, pool.size))
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(stream);
            Stream::Live(rng)
        }
    }
}

impl RandomSource for Stream {
    fn next_uniform(&mut self) -> f64 {
        match self {
            Stream::Live(rng) => rng.next_uniform(),
            Stream::Pooled(pool) => pool.next_uniform(),
        }
    }
}

/// Per-purpose random streams for one game.
#[derive(Debug, Clone)]
pub struct GameRng {
    /// First-stage draw: SO/BB/HP/HR or ball in play.
    pub outcome: Stream,
    /// Hit-vs-out and subtype draws on a ball in play.
    pub contact: Stream,
    /// Baserunning tables.
    pub running: Stream,
    /// Pitch-sequence generation.
    pub pitch: Stream,
    /// Micro-event rolls between pitches.
    pub micro: Stream,
    /// Platoon strength per matchup.
    pub platoon: Stream,
    /// Batted-ball type, spray and depth.
    pub batted_ball: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64, pool: &PoolConfig) -> Self {
        let mut batted_ball = ChaCha8Rng::seed_from_u64(seed);
        batted_ball.set_stream(7);
        Self {
            outcome: Stream::new(seed, 1, pool),
            contact: Stream::new(seed, 2, pool),
            running: Stream::new(seed, 3, pool),
            pitch: Stream::new(seed, 4, pool),
            micro: Stream::new(seed, 5, pool),
            platoon: Stream::new(seed, 6, pool),
            batted_ball,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Drives resolver branches deterministically in tests and replays.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            cursor: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(&[value])
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_uniform(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let v = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        v
    }
}
