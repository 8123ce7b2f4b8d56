//! # Pitch sequences
//!
//! Builds a plausible pitch-by-pitch sequence that ends in an already
//! sampled macro outcome. Pitches are drawn from count-dependent Markov
//! transition tables over `B C S F`, then the terminal pitch is appended:
//! the fourth ball for a walk, the third strike for a strikeout, `X` for a
//! ball in play. A hit batsman is a single `H`.
//!
//! The count never goes illegal on the way: a sequence that ends in play
//! never shows a fourth ball or a third strike, a walk never shows a third
//! strike, and a strikeout never shows a fourth ball.

use tracing::trace;

use super::outcome::{MacroOutcome, PitchCode};
use super::rng::RandomSource;

/// Generated pitches before the terminal pitch is forced.
pub const MAX_GENERATED_PITCHES: usize = 14;

/// Longest possible sequence: a capped walk that still needs four balls.
pub const MAX_SEQUENCE_LEN: usize = MAX_GENERATED_PITCHES + 4;

/// How the sequence has to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Walk,
    Strikeout,
    InPlay,
    HitByPitch,
}

impl SequenceKind {
    pub fn for_outcome(outcome: MacroOutcome) -> Self {
        match outcome {
            MacroOutcome::Bb => SequenceKind::Walk,
            MacroOutcome::So => SequenceKind::Strikeout,
            MacroOutcome::Hp => SequenceKind::HitByPitch,
            _ => SequenceKind::InPlay,
        }
    }
}

/// Balls and strikes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

impl Count {
    pub fn new(balls: u8, strikes: u8) -> Self {
        Self { balls, strikes }
    }

    /// Count after `pitch`. Fouls with two strikes leave the count alone.
    pub fn after(self, pitch: PitchCode) -> Count {
        match pitch {
            PitchCode::B => Count::new(self.balls + 1, self.strikes),
            PitchCode::C | PitchCode::S => Count::new(self.balls, self.strikes + 1),
            PitchCode::F if self.strikes < 2 => Count::new(self.balls, self.strikes + 1),
            PitchCode::F | PitchCode::X | PitchCode::H => self,
        }
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes)
    }
}

// ========== Transition tables ==========

/// `[B, C, S, F]` weights by count.
fn transition(count: Count) -> [f64; 4] {
    match (count.balls, count.strikes) {
        (0, 0) => [0.35, 0.40, 0.15, 0.10],
        (1, 0) => [0.38, 0.38, 0.14, 0.10],
        (2, 0) => [0.40, 0.36, 0.14, 0.10],
        (3, 0) => [0.42, 0.35, 0.13, 0.10],
        (0, 1) => [0.32, 0.42, 0.16, 0.10],
        (1, 1) => [0.36, 0.38, 0.16, 0.10],
        (2, 1) => [0.38, 0.37, 0.15, 0.10],
        (3, 1) => [0.40, 0.35, 0.15, 0.10],
        (0, 2) => [0.30, 0.40, 0.18, 0.12],
        (1, 2) => [0.33, 0.39, 0.17, 0.11],
        (2, 2) => [0.37, 0.36, 0.17, 0.10],
        (3, 2) => [0.38, 0.36, 0.16, 0.10],
        _ => [0.35, 0.38, 0.17, 0.10],
    }
}

const PITCHES: [PitchCode; 4] = [PitchCode::B, PitchCode::C, PitchCode::S, PitchCode::F];

/// Transition weights with the pitches that would end the at-bat the wrong way removed.
fn constrained_weights(count: Count, kind: SequenceKind) -> [f64; 4] {
    let mut w = transition(count);

    if count.strikes >= 2 && kind != SequenceKind::Strikeout {
        w[3] += w[1] + w[2];
        w[1] = 0.0;
        w[2] = 0.0;
    }
    if count.balls >= 3 && kind != SequenceKind::Walk {
        // the ball's weight mostly becomes fouls
        let ball = w[0];
        w[0] = 0.0;
        if count.strikes >= 2 && kind != SequenceKind::Strikeout {
            w[3] += ball;
        } else {
            w[3] += ball * 0.7;
            w[1] += ball * 0.15;
            w[2] += ball * 0.15;
        }
    }
    w
}

/// Draws the next non-terminal pitch.
pub fn next_pitch(count: Count, kind: SequenceKind, rng: &mut dyn RandomSource) -> PitchCode {
    let w = constrained_weights(count, kind);
    let total: f64 = w.iter().sum();
    let r = rng.next_uniform() * total;
    let mut cumulative = 0.0;
    for (pitch, weight) in PITCHES.iter().zip(w) {
        cumulative += weight;
        if r < cumulative {
            return *pitch;
        }
    }
    PitchCode::F
}

/// Per-pitch chance the batter puts the ball in play.
fn contact_chance(count: Count, pitches_seen: usize) -> f64 {
    let mut p = 0.15 + pitches_seen as f64 * 0.05;
    if count.strikes == 2 {
        p += 0.15;
    }
    if count.balls >= 2 {
        p += 0.10;
    }
    if count.balls > count.strikes {
        p += 0.10;
    }
    p.min(0.50)
}

// ========== Generation ==========

/// Pitch sequence ending in `outcome`. Only macro outcomes have sequences.
pub fn generate_sequence(outcome: MacroOutcome, rng: &mut dyn RandomSource) -> Vec<PitchCode> {
    let kind = SequenceKind::for_outcome(outcome);
    let pitches = match kind {
        SequenceKind::HitByPitch => vec![PitchCode::H],
        SequenceKind::Walk => walk_sequence(rng),
        SequenceKind::Strikeout => strikeout_sequence(rng),
        SequenceKind::InPlay => in_play_sequence(rng),
    };
    trace!(
        outcome = %outcome,
        pitches = %pitches.iter().map(|p| p.as_char()).collect::<String>(),
        "pitch sequence"
    );
    pitches
}

fn walk_sequence(rng: &mut dyn RandomSource) -> Vec<PitchCode> {
    let mut seq = Vec::with_capacity(8);
    let mut count = Count::default();
    while count.balls < 4 && seq.len() < MAX_GENERATED_PITCHES {
        let pitch = next_pitch(count, SequenceKind::Walk, rng);
        count = count.after(pitch);
        seq.push(pitch);
    }
    while count.balls < 4 {
        count = count.after(PitchCode::B);
        seq.push(PitchCode::B);
    }
    seq
}

fn strikeout_sequence(rng: &mut dyn RandomSource) -> Vec<PitchCode> {
    let mut seq = Vec::with_capacity(8);
    let mut count = Count::default();
    while count.strikes < 3 && seq.len() < MAX_GENERATED_PITCHES {
        let pitch = next_pitch(count, SequenceKind::Strikeout, rng);
        count = count.after(pitch);
        seq.push(pitch);
    }
    while count.strikes < 3 {
        count = count.after(PitchCode::S);
        seq.push(PitchCode::S);
    }
    seq
}

fn in_play_sequence(rng: &mut dyn RandomSource) -> Vec<PitchCode> {
    let mut seq = Vec::with_capacity(6);
    let mut count = Count::default();
    while seq.len() < MAX_GENERATED_PITCHES && !rng.chance(contact_chance(count, seq.len())) {
        let pitch = next_pitch(count, SequenceKind::InPlay, rng);
        count = count.after(pitch);
        seq.push(pitch);
    }
    seq.push(PitchCode::X);
    seq
}

/// Final count of a sequence, ignoring the terminal `X`/`H`.
pub fn final_count(pitches: &[PitchCode]) -> Count {
    pitches.iter().fold(Count::default(), |c, p| c.after(*p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hit_by_pitch_is_one_pitch() {
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(generate_sequence(MacroOutcome::Hp, &mut rng), vec![PitchCode::H]);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_count_fouls_with_two_strikes() {
        let c = Count::new(1, 2);
        assert_eq!(c.after(PitchCode::F), c);
        assert_eq!(Count::new(0, 1).after(PitchCode::F), Count::new(0, 2));
        assert_eq!(c.to_string(), "1-2");
    }

    #[test]
    fn test_two_strikes_in_play_only_fouls_or_balls() {
        let w = constrained_weights(Count::new(1, 2), SequenceKind::InPlay);
        assert_eq!(w[1], 0.0);
        assert_eq!(w[2], 0.0);
        let w = constrained_weights(Count::new(3, 2), SequenceKind::InPlay);
        assert_eq!(&w[..3], &[0.0, 0.0, 0.0]);
        assert!((w[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_three_balls_no_ball_unless_walk() {
        let w = constrained_weights(Count::new(3, 1), SequenceKind::Strikeout);
        assert_eq!(w[0], 0.0);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        let w = constrained_weights(Count::new(3, 1), SequenceKind::Walk);
        assert!(w[0] > 0.0);
    }

    #[test]
    fn test_sequences_end_correctly() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..2_000 {
            let walk = generate_sequence(MacroOutcome::Bb, &mut rng);
            let c = final_count(&walk);
            assert_eq!(c.balls, 4);
            assert!(c.strikes <= 2);
            assert_eq!(walk.last(), Some(&PitchCode::B));

            let k = generate_sequence(MacroOutcome::So, &mut rng);
            let c = final_count(&k);
            assert_eq!(c.strikes, 3);
            assert!(c.balls <= 3);
            assert!(k.last().is_some_and(|p| matches!(p, PitchCode::C | PitchCode::S)));

            let play = generate_sequence(MacroOutcome::Go, &mut rng);
            let c = final_count(&play);
            assert!(c.balls <= 3 && c.strikes <= 2);
            assert_eq!(play.last(), Some(&PitchCode::X));
            assert_eq!(play.iter().filter(|p| **p == PitchCode::X).count(), 1);
        }
    }

    #[test]
    fn test_cap_forces_terminal_pitch() {
        // never makes contact; always fouls
        let mut rng = ScriptedRandom::constant(0.9999);
        let seq = generate_sequence(MacroOutcome::Sl, &mut rng);
        assert_eq!(seq.len(), MAX_GENERATED_PITCHES + 1);
        assert_eq!(seq.last(), Some(&PitchCode::X));

        let mut rng = ScriptedRandom::constant(0.9999);
        let seq = generate_sequence(MacroOutcome::Bb, &mut rng);
        assert_eq!(final_count(&seq).balls, 4);
        assert!(seq.len() <= MAX_SEQUENCE_LEN);
    }
}
