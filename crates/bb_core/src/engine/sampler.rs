//! Outcome sampling by cumulative scan.

use super::distribution::OutcomeProbabilityVector;
use super::outcome::MacroOutcome;
use super::rng::RandomSource;

/// Returns the first entry whose running sum exceeds `r`, or `None`.
fn scan(probs: &[f64; 4], codes: &[MacroOutcome; 4], r: f64) -> Option<MacroOutcome> {
    let mut cumulative = 0.0;
    for (p, code) in probs.iter().zip(codes.iter()) {
        cumulative += p;
        if r < cumulative {
            return Some(*code);
        }
    }
    None
}

/// Draws one plate-appearance outcome.
///
/// `outcome_rng` supplies the SO/BB/HP/HR draw; `contact_rng` supplies the
/// hit-vs-out draw and the subtype draw on a ball in play. Floating-point
/// misses fall back to the last category of the group, so this never fails.
pub fn sample_outcome(
    vector: &OutcomeProbabilityVector,
    outcome_rng: &mut dyn RandomSource,
    contact_rng: &mut dyn RandomSource,
) -> MacroOutcome {
    let r1 = outcome_rng.next_uniform();
    if let Some(outcome) = scan(vector.base(), &MacroOutcome::BASE, r1) {
        return outcome;
    }

    let r2 = contact_rng.next_uniform();
    if r2 < vector.babip() {
        let r3 = contact_rng.next_uniform();
        scan(vector.hits(), &MacroOutcome::HITS, r3).unwrap_or(MacroOutcome::Tl)
    } else {
        let r4 = contact_rng.next_uniform();
        scan(vector.outs(), &MacroOutcome::OUTS, r4).unwrap_or(MacroOutcome::Po)
    }
}
