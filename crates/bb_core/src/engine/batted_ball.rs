//! Batted-ball detail: type, spray sector, depth and fielder.
//!
//! Only fly and line outs read the result (tag-up decisions); for every other
//! ball in play it is descriptive.

use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Triangular};
use serde::{Deserialize, Serialize};

use super::outcome::MacroOutcome;
use crate::models::{Player, Throws};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallKind {
    Grounder,
    Fly,
    Liner,
    Popup,
}

/// Spray sectors from the left-field line to the right-field line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    LeftLine,
    Left,
    LeftCenter,
    Center,
    RightCenter,
    Right,
    RightLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Depth {
    Shallow,
    Medium,
    Deep,
    ExtraDeep,
}

/// Defensive positions, numbered the way scorers number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    Shortstop,
    LeftField,
    CenterField,
    RightField,
}

/// Throwing-arm class of a fielder for tag-up plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmClass {
    Strong,
    Weak,
    Neutral,
}

const SECTORS: [Sector; 7] = [
    Sector::LeftLine,
    Sector::Left,
    Sector::LeftCenter,
    Sector::Center,
    Sector::RightCenter,
    Sector::Right,
    Sector::RightLine,
];

const KINDS: [BallKind; 4] = [BallKind::Grounder, BallKind::Fly, BallKind::Liner, BallKind::Popup];

impl Sector {
    fn mirrored(self) -> Sector {
        match self {
            Sector::LeftLine => Sector::RightLine,
            Sector::Left => Sector::Right,
            Sector::LeftCenter => Sector::RightCenter,
            Sector::Center => Sector::Center,
            Sector::RightCenter => Sector::LeftCenter,
            Sector::Right => Sector::Left,
            Sector::RightLine => Sector::LeftLine,
        }
    }

    fn depth_nudge(self) -> f64 {
        match self {
            Sector::LeftCenter | Sector::Center | Sector::RightCenter => 0.05,
            Sector::LeftLine | Sector::RightLine => -0.05,
            _ => 0.0,
        }
    }
}

impl Depth {
    pub fn from_unit(x: f64) -> Depth {
        if x < 0.30 {
            Depth::Shallow
        } else if x < 0.65 {
            Depth::Medium
        } else if x < 0.85 {
            Depth::Deep
        } else {
            Depth::ExtraDeep
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Depth::Shallow => "S",
            Depth::Medium => "",
            Depth::Deep => "D",
            Depth::ExtraDeep => "XD",
        }
    }
}

impl Position {
    pub fn number(self) -> u8 {
        match self {
            Position::Pitcher => 1,
            Position::Catcher => 2,
            Position::FirstBase => 3,
            Position::SecondBase => 4,
            Position::ThirdBase => 5,
            Position::Shortstop => 6,
            Position::LeftField => 7,
            Position::CenterField => 8,
            Position::RightField => 9,
        }
    }

    pub fn is_outfield(self) -> bool {
        matches!(
            self,
            Position::LeftField | Position::CenterField | Position::RightField
        )
    }

    pub fn arm(self) -> ArmClass {
        match self {
            Position::CenterField | Position::RightField => ArmClass::Strong,
            Position::LeftField => ArmClass::Weak,
            _ => ArmClass::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattedBall {
    pub kind: BallKind,
    pub sector: Sector,
    pub depth: Depth,
    pub fielder: Position,
}

impl BattedBall {
    /// Scorer-style location: kind letter, fielder number, outfield depth.
    /// `F8D` is a deep fly to center, `G6` a grounder to short.
    pub fn location_code(&self) -> String {
        let kind = match self.kind {
            BallKind::Grounder => 'G',
            BallKind::Fly => 'F',
            BallKind::Liner => 'L',
            BallKind::Popup => 'P',
        };
        let depth = if self.fielder.is_outfield() {
            self.depth.suffix()
        } else {
            ""
        };
        format!("{}{}{}", kind, self.fielder.number(), depth)
    }
}

// ============================================================================
// Generation tables
// ============================================================================

/// GB / FB / LD / PU weights by outcome.
fn kind_weights(outcome: MacroOutcome) -> [f64; 4] {
    match outcome {
        MacroOutcome::Ih => [0.90, 0.0, 0.05, 0.05],
        MacroOutcome::Sl => [0.45, 0.15, 0.40, 0.0],
        MacroOutcome::Dl => [0.15, 0.45, 0.40, 0.0],
        MacroOutcome::Tl => [0.05, 0.55, 0.40, 0.0],
        MacroOutcome::Hr => [0.0, 0.75, 0.25, 0.0],
        MacroOutcome::Fo => [0.0, 1.0, 0.0, 0.0],
        MacroOutcome::Lo => [0.0, 0.0, 1.0, 0.0],
        MacroOutcome::Po => [0.0, 0.0, 0.0, 1.0],
        _ => [1.0, 0.0, 0.0, 0.0],
    }
}

/// Spray weights for a right-handed batter, LL..RL.
fn sector_weights(outcome: MacroOutcome) -> [f64; 7] {
    match outcome {
        MacroOutcome::Hr => [0.04, 0.26, 0.24, 0.14, 0.14, 0.14, 0.04],
        MacroOutcome::Dl => [0.14, 0.18, 0.16, 0.08, 0.14, 0.16, 0.14],
        MacroOutcome::Tl => [0.10, 0.10, 0.22, 0.16, 0.22, 0.10, 0.10],
        MacroOutcome::Po => [0.14, 0.18, 0.14, 0.08, 0.14, 0.18, 0.14],
        _ => [0.08, 0.18, 0.18, 0.16, 0.16, 0.16, 0.08],
    }
}

/// Sector multipliers by ball kind: grounders pull, flies go to center and
/// the opposite field, popups stay on the pull side of the infield.
fn kind_sector_multipliers(kind: BallKind) -> [f64; 7] {
    match kind {
        BallKind::Grounder => [1.3, 1.2, 1.1, 0.9, 0.8, 0.7, 0.6],
        BallKind::Fly => [0.7, 0.8, 0.9, 1.2, 1.1, 1.0, 0.8],
        BallKind::Liner => [1.0; 7],
        BallKind::Popup => [1.1, 1.2, 1.3, 1.1, 1.0, 0.9, 0.8],
    }
}

fn spray_weights(outcome: MacroOutcome, kind: BallKind) -> [f64; 7] {
    let mut weights = sector_weights(outcome);
    for (w, m) in weights.iter_mut().zip(kind_sector_multipliers(kind)) {
        *w *= m;
    }
    weights
}

/// (min, max, mode) depth on a unit scale.
fn depth_shape(outcome: MacroOutcome, kind: BallKind) -> (f64, f64, f64) {
    match (outcome, kind) {
        (_, BallKind::Grounder) => (0.0, 0.5, 0.15),
        (_, BallKind::Popup) => (0.0, 0.4, 0.15),
        (MacroOutcome::Hr, _) => (0.85, 1.0, 0.95),
        (MacroOutcome::Tl, _) => (0.65, 1.0, 0.9),
        (MacroOutcome::Dl, _) => (0.5, 1.0, 0.8),
        (MacroOutcome::Sl, _) => (0.15, 0.75, 0.45),
        (MacroOutcome::Lo, _) => (0.1, 0.9, 0.45),
        _ => (0.2, 1.0, 0.6),
    }
}

fn fielder_candidates(kind: BallKind, sector: Sector, depth: Depth) -> &'static [Position] {
    use Position::*;
    let infield = kind == BallKind::Grounder
        || kind == BallKind::Popup
        || (kind == BallKind::Liner && depth == Depth::Shallow);
    if infield {
        let catcher_reach = kind == BallKind::Popup;
        return match sector {
            Sector::LeftLine if catcher_reach => &[ThirdBase, Catcher],
            Sector::LeftLine => &[ThirdBase],
            Sector::Left => &[ThirdBase, Shortstop],
            Sector::LeftCenter => &[Shortstop],
            Sector::Center => &[Pitcher, Shortstop, SecondBase],
            Sector::RightCenter => &[SecondBase],
            Sector::Right => &[FirstBase, SecondBase],
            Sector::RightLine if catcher_reach => &[FirstBase, Catcher],
            Sector::RightLine => &[FirstBase],
        };
    }
    match sector {
        Sector::LeftLine | Sector::Left => &[LeftField],
        Sector::LeftCenter => &[LeftField, CenterField],
        Sector::Center => &[CenterField],
        Sector::RightCenter => &[CenterField, RightField],
        Sector::Right | Sector::RightLine => &[RightField],
    }
}

fn pick<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0,
    }
}

/// Draws batted-ball detail for a ball-in-play outcome or a home run.
/// Returns `None` for strikeouts, walks and hit batsmen.
pub fn generate_batted_ball<R: Rng + ?Sized>(
    outcome: MacroOutcome,
    batter: &Player,
    pitcher_throws: Throws,
    rng: &mut R,
) -> Option<BattedBall> {
    if matches!(outcome, MacroOutcome::So | MacroOutcome::Bb | MacroOutcome::Hp) {
        return None;
    }

    let mut kinds = kind_weights(outcome);
    if outcome.is_hit() {
        // profile 1 beats the ball into the ground, 5 lifts it
        let tilt = f64::from(batter.profile.unwrap_or(3)) - 3.0;
        kinds[0] *= (1.0 - 0.15 * tilt).max(0.1);
        kinds[1] *= (1.0 + 0.15 * tilt).max(0.1);
    }
    let kind = KINDS[pick(&kinds, rng)];

    let mut sector = SECTORS[pick(&spray_weights(outcome, kind), rng)];
    if batter.bats.side_against(pitcher_throws) == Throws::L {
        sector = sector.mirrored();
    }

    let (min, max, mode) = depth_shape(outcome, kind);
    let raw = match Triangular::new(min, max, mode) {
        Ok(tri) => tri.sample(rng),
        Err(_) => mode,
    };
    let depth = Depth::from_unit((raw + sector.depth_nudge()).clamp(0.0, 1.0));

    let candidates = fielder_candidates(kind, sector, depth);
    let fielder = candidates[rng.gen_range(0..candidates.len())];

    Some(BattedBall {
        kind,
        sector,
        depth,
        fielder,
    })
}
