//! Base occupancy.
//!
//! `BaseState` is a `Copy` value: resolvers read a snapshot and return a new
//! one, the game loop swaps it in. Nothing mutates a shared instance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::PlayerId;

/// A position on the base paths. `Batter` is the box, `Home` means scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    Batter,
    First,
    Second,
    Third,
    Home,
}

impl Base {
    pub const OCCUPIABLE: [Base; 3] = [Base::First, Base::Second, Base::Third];

    pub fn next(self) -> Base {
        match self {
            Base::Batter => Base::First,
            Base::First => Base::Second,
            Base::Second => Base::Third,
            Base::Third | Base::Home => Base::Home,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Base::First => Some(0),
            Base::Second => Some(1),
            Base::Third => Some(2),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Base::First => 1,
            Base::Second => 2,
            Base::Third => 4,
            _ => 0,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Base::Batter => "batter",
            Base::First => "1st",
            Base::Second => "2nd",
            Base::Third => "3rd",
            Base::Home => "home",
        };
        f.write_str(s)
    }
}

/// Occupancy bitmask: 1 = first, 2 = second, 4 = third.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Occupancy(u8);

impl Occupancy {
    pub const EMPTY: Occupancy = Occupancy(0);
    pub const FIRST: Occupancy = Occupancy(1);
    pub const SECOND: Occupancy = Occupancy(2);
    pub const FIRST_SECOND: Occupancy = Occupancy(3);
    pub const THIRD: Occupancy = Occupancy(4);
    pub const FIRST_THIRD: Occupancy = Occupancy(5);
    pub const SECOND_THIRD: Occupancy = Occupancy(6);
    pub const LOADED: Occupancy = Occupancy(7);

    pub const ALL: [Occupancy; 8] = [
        Occupancy::EMPTY,
        Occupancy::FIRST,
        Occupancy::SECOND,
        Occupancy::FIRST_SECOND,
        Occupancy::THIRD,
        Occupancy::FIRST_THIRD,
        Occupancy::SECOND_THIRD,
        Occupancy::LOADED,
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has(self, base: Base) -> bool {
        self.0 & base.bit() != 0
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |b: Base| if self.has(b) { 'X' } else { '-' };
        write!(f, "{}{}{}", mark(Base::First), mark(Base::Second), mark(Base::Third))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BaseState {
    slots: [Option<PlayerId>; 3],
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_runners(first: Option<PlayerId>, second: Option<PlayerId>, third: Option<PlayerId>) -> Self {
        Self {
            slots: [first, second, third],
        }
    }

    /// Fills the occupied bases of `occ` with ids 101/102/103. Test and demo helper.
    pub fn with_occupancy(occ: Occupancy) -> Self {
        let mut state = Self::empty();
        for (i, base) in Base::OCCUPIABLE.iter().enumerate() {
            if occ.has(*base) {
                state.slots[i] = Some(101 + i as PlayerId);
            }
        }
        state
    }

    pub fn runner_on(&self, base: Base) -> Option<PlayerId> {
        base.index().and_then(|i| self.slots[i])
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        self.runner_on(base).is_some()
    }

    pub fn occupancy(&self) -> Occupancy {
        let bits = Base::OCCUPIABLE
            .iter()
            .filter(|b| self.is_occupied(**b))
            .fold(0u8, |acc, b| acc | b.bit());
        Occupancy(bits)
    }

    pub fn runner_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.runner_count() == 0
    }

    /// Occupied bases with their runners, lead runner first.
    pub fn runners_lead_first(&self) -> Vec<(Base, PlayerId)> {
        [Base::Third, Base::Second, Base::First]
            .iter()
            .filter_map(|b| self.runner_on(*b).map(|id| (*b, id)))
            .collect()
    }

    pub fn contains(&self, runner: PlayerId) -> bool {
        self.slots.iter().any(|s| *s == Some(runner))
    }

    /// Returns a copy with `runner` placed on `base` (or the base cleared).
    pub fn with(mut self, base: Base, runner: Option<PlayerId>) -> Self {
        if let Some(i) = base.index() {
            self.slots[i] = runner;
        }
        self
    }

    /// No runner identity on two bases.
    pub fn check_consistency(&self) -> Result<()> {
        let ids: Vec<PlayerId> = self.slots.iter().flatten().copied().collect();
        for (i, a) in ids.iter().enumerate() {
            if ids[i + 1..].contains(a) {
                return Err(SimError::InvariantViolation(format!(
                    "runner {} occupies two bases ({})",
                    a,
                    self.occupancy()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for BaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.occupancy())
    }
}
