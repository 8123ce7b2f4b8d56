//! bb - baseball game simulator
//!
//! Simulates one game or a series between two teams from CSV rosters.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bb")]
#[command(about = "Simulate baseball games from rosters and league averages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct Matchup {
    /// League averages (YAML or JSON)
    #[arg(long, default_value = "data/league.yaml")]
    league: PathBuf,

    /// Team metadata and park factors CSV
    #[arg(long, default_value = "data/teams.csv")]
    teams: PathBuf,

    /// Directory holding one `<ABBREV>.csv` roster per team
    #[arg(long, default_value = "data/rosters")]
    rosters: PathBuf,

    /// Visiting team abbreviation
    #[arg(long)]
    away: String,

    /// Home team abbreviation
    #[arg(long)]
    home: String,

    /// Simulation config (YAML or JSON); defaults to the BB_SIM_PROFILE preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base random seed
    #[arg(long, default_value = "1")]
    seed: u64,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate a single game
    Game {
        #[command(flatten)]
        matchup: Matchup,

        /// Print the full game summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Simulate a series of games in parallel
    Series {
        #[command(flatten)]
        matchup: Matchup,

        /// Number of games
        #[arg(long, default_value = "162")]
        games: u32,

        /// Print the series summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn setup(m: &Matchup) -> Result<(bb_core::GameSimulator, bb_core::Team, bb_core::Team)> {
    let league = bb_cli::load_league(&m.league)?;
    let config = match &m.config {
        Some(path) => bb_cli::load_config(path)?,
        None => bb_core::SimConfig::from_env_or_default(),
    };
    let teams = bb_cli::load_teams(&m.teams)?;
    let away = bb_cli::load_team(&m.rosters, &teams, &m.away)?;
    let home = bb_cli::load_team(&m.rosters, &teams, &m.home)?;
    let sim = bb_core::GameSimulator::new(config, league).context("Failed to build simulator")?;
    Ok((sim, away, home))
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Game { matchup, json } => {
            let (sim, away, home) = setup(&matchup)?;
            let game = sim
                .simulate_game(&away, &home, matchup.seed)
                .context("Game simulation failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&game)?);
            } else {
                println!("{} at {} (seed {})\n", away.name, home.name, matchup.seed);
                print!("{}", game.line_score());
                if game.walk_off {
                    println!("\nWalk-off win for {}", home.name);
                }
            }
        }

        Commands::Series {
            matchup,
            games,
            json,
        } => {
            let (sim, away, home) = setup(&matchup)?;
            let summary = bb_core::simulate_series(&sim, &away, &home, games, matchup.seed)
                .context("Series simulation failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{} games, {} at {}", summary.games, away.name, home.name);
                println!(
                    "   {:<6} wins: {:>4}   runs/game: {:.2}",
                    summary.away, summary.away_wins, summary.away_runs_avg
                );
                println!(
                    "   {:<6} wins: {:>4}   runs/game: {:.2}",
                    summary.home, summary.home_wins, summary.home_runs_avg
                );
                println!(
                    "   walk-offs: {}   extra innings: {}   longest: {} innings",
                    summary.walk_offs, summary.extra_inning_games, summary.longest_game
                );
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("bb CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
