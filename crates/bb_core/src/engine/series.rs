//! Parallel series of games between two teams.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::game::{GameSimulator, GameSummary, Team};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub away: String,
    pub home: String,
    pub games: u32,
    pub away_wins: u32,
    pub home_wins: u32,
    pub away_runs_avg: f64,
    pub home_runs_avg: f64,
    pub walk_offs: u32,
    pub extra_inning_games: u32,
    /// Innings in the longest game.
    pub longest_game: u32,
}

impl SeriesSummary {
    pub fn from_games(away: &str, home: &str, games: &[GameSummary]) -> Self {
        let n = games.len() as u32;
        let mut s = SeriesSummary {
            away: away.to_string(),
            home: home.to_string(),
            games: n,
            ..Default::default()
        };
        let mut away_runs = 0u64;
        let mut home_runs = 0u64;
        for g in games {
            if g.home_won() {
                s.home_wins += 1;
            } else {
                s.away_wins += 1;
            }
            away_runs += u64::from(g.away_runs());
            home_runs += u64::from(g.home_runs());
            s.walk_offs += u32::from(g.walk_off);
            s.extra_inning_games += u32::from(g.innings > super::game::REGULATION_INNINGS);
            s.longest_game = s.longest_game.max(g.innings);
        }
        if n > 0 {
            s.away_runs_avg = away_runs as f64 / f64::from(n);
            s.home_runs_avg = home_runs as f64 / f64::from(n);
        }
        s
    }
}

/// Plays `games` games in parallel. Game `i` uses seed `base_seed + i`, so the
/// result does not depend on thread scheduling.
pub fn simulate_series(
    sim: &GameSimulator,
    away: &Team,
    home: &Team,
    games: u32,
    base_seed: u64,
) -> Result<SeriesSummary> {
    let results: Vec<GameSummary> = (0..games)
        .into_par_iter()
        .map(|i| sim.simulate_game(away, home, base_seed.wrapping_add(u64::from(i))))
        .collect::<Result<Vec<_>>>()?;

    let summary = SeriesSummary::from_games(&away.abbrev, &home.abbrev, &results);
    info!(
        away = %summary.away,
        home = %summary.home,
        games,
        away_wins = summary.away_wins,
        home_wins = summary.home_wins,
        "series complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SimConfig;
    use crate::models::LeagueContext;
    use crate::testing::team;

    fn sim() -> GameSimulator {
        GameSimulator::new(SimConfig::default(), LeagueContext::modern()).unwrap()
    }

    #[test]
    fn test_series_counts_every_game() {
        let s = simulate_series(&sim(), &team("AWY", 100), &team("HOM", 200), 24, 1000).unwrap();
        assert_eq!(s.games, 24);
        assert_eq!(s.away_wins + s.home_wins, 24);
        assert!(s.longest_game >= 9);
        assert!(s.away_runs_avg > 0.5 && s.away_runs_avg < 15.0);
        assert!(s.walk_offs <= s.home_wins);
    }

    #[test]
    fn test_series_is_deterministic_across_threads() {
        let (away, home) = (team("AWY", 100), team("HOM", 200));
        let a = simulate_series(&sim(), &away, &home, 16, 7).unwrap();
        let b = simulate_series(&sim(), &away, &home, 16, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_series_matches_single_games() {
        let (away, home) = (team("AWY", 100), team("HOM", 200));
        let s = simulate_series(&sim(), &away, &home, 3, 50).unwrap();
        let games: Vec<GameSummary> = (50..53)
            .map(|seed| sim().simulate_game(&away, &home, seed).unwrap())
            .collect();
        assert_eq!(s, SeriesSummary::from_games("AWY", "HOM", &games));
    }

    #[test]
    fn test_empty_series() {
        let s = SeriesSummary::from_games("A", "B", &[]);
        assert_eq!(s.games, 0);
        assert_eq!(s.away_runs_avg, 0.0);
    }
}
