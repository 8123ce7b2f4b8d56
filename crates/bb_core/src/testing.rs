//! Shared fixtures for unit tests.

use crate::engine::game::Team;
use crate::models::{Bats, ParkFactors, Player, RateKey, RateTable, Throws};

/// League-average-ish rates for either side of a matchup.
pub(crate) fn average_rates() -> RateTable {
    RateTable::from_pairs(&[
        (RateKey::So, 0.22),
        (RateKey::Bb, 0.085),
        (RateKey::Hp, 0.011),
        (RateKey::Hr, 0.031),
        (RateKey::Ih, 0.025),
        (RateKey::Sl, 0.14),
        (RateKey::Dl, 0.045),
        (RateKey::Tl, 0.004),
        (RateKey::Babip, 0.295),
        (RateKey::GbFb, 1.05),
    ])
}

pub(crate) fn batter(id: u32) -> Player {
    Player::new(id, "TST", "Test", &format!("Batter{}", id))
        .with_hands(Bats::R, Throws::R)
        .with_batting(average_rates())
}

pub(crate) fn pitcher(id: u32) -> Player {
    Player::new(id, "TST", "Test", &format!("Pitcher{}", id))
        .with_hands(Bats::R, Throws::R)
        .with_pitching(average_rates())
}

/// Nine average batters with ids `base + 1..=base + 9` and a pitcher `base + 50`.
pub(crate) fn team(abbrev: &str, base: u32) -> Team {
    let lineup = (1..=9).map(|i| batter(base + i)).collect();
    Team::new(abbrev, abbrev, lineup, pitcher(base + 50), ParkFactors::neutral(abbrev))
}
