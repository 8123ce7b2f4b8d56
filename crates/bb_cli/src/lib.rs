//! Data loading for bb_core
//!
//! CSV rosters, CSV team/park metadata, YAML or JSON league averages and
//! simulation config → engine types.

use anyhow::{bail, Context, Result};
use bb_core::engine::config::SimConfig;
use bb_core::{Bats, LeagueContext, ParkFactors, Player, RateKey, RateTable, Team, Throws};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Batters that make up a lineup.
pub const LINEUP_SIZE: usize = 9;

// ========== Rosters ==========

/// One roster row. `speed` and `profile` columns are optional.
#[derive(Debug, Clone, Deserialize)]
struct RosterRow {
    id: u32,
    first: String,
    last: String,
    pos: String,
    bats: String,
    throws: String,
    so: f64,
    bb: f64,
    hp: f64,
    hr: f64,
    ih: f64,
    sl: f64,
    dl: f64,
    tl: f64,
    babip: f64,
    gbfb: f64,
    #[serde(default)]
    speed: Option<u8>,
    #[serde(default)]
    profile: Option<u8>,
}

impl RosterRow {
    fn is_pitcher(&self) -> bool {
        self.pos.to_ascii_uppercase().contains('P')
    }

    fn rates(&self) -> RateTable {
        RateTable::from_pairs(&[
            (RateKey::So, self.so),
            (RateKey::Bb, self.bb),
            (RateKey::Hp, self.hp),
            (RateKey::Hr, self.hr),
            (RateKey::Ih, self.ih),
            (RateKey::Sl, self.sl),
            (RateKey::Dl, self.dl),
            (RateKey::Tl, self.tl),
            (RateKey::Babip, self.babip),
            (RateKey::GbFb, self.gbfb),
        ])
    }

    fn into_player(self, team: &str) -> Result<Player> {
        let bats = Bats::parse(&self.bats)
            .with_context(|| format!("player {}: bad bats value", self.id))?;
        let throws = Throws::parse(&self.throws)
            .with_context(|| format!("player {}: bad throws value", self.id))?;
        let rates = self.rates();
        let mut player = Player::new(self.id, team, self.first.trim(), self.last.trim())
            .with_hands(bats, throws);
        player = if self.is_pitcher() {
            player.with_pitching(rates)
        } else {
            player.with_batting(rates)
        };
        if let Some(speed) = self.speed {
            player = player.with_speed(speed);
        }
        if let Some(profile) = self.profile {
            player = player.with_profile(profile);
        }
        Ok(player)
    }
}

/// A team's players split into batters and pitchers, in file order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub team: String,
    pub batters: Vec<Player>,
    pub pitchers: Vec<Player>,
}

impl Roster {
    /// First nine batters and the first pitcher.
    pub fn into_team(self, meta: &TeamMeta) -> Result<Team> {
        if self.batters.len() < LINEUP_SIZE {
            bail!(
                "{} roster has {} batters, need {}",
                self.team,
                self.batters.len(),
                LINEUP_SIZE
            );
        }
        let Some(pitcher) = self.pitchers.into_iter().next() else {
            bail!("{} roster has no pitcher", self.team);
        };
        let lineup = self.batters.into_iter().take(LINEUP_SIZE).collect();
        let team = Team::new(&meta.abbrev, &meta.name, lineup, pitcher, meta.park_factors());
        team.validate()
            .with_context(|| format!("{} roster failed validation", meta.abbrev))?;
        Ok(team)
    }
}

/// Loads a roster CSV:
/// `id,first,last,pos,bats,throws,so,bb,hp,hr,ih,sl,dl,tl,babip,gbfb[,speed,profile]`.
///
/// Rows whose `pos` contains `P` are pitchers and their rates are read as
/// pitching rates. Bad rows fail the load.
pub fn load_roster(path: &Path, team: &str) -> Result<Roster> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open roster CSV: {}", path.display()))?;

    let mut roster = Roster {
        team: team.to_string(),
        ..Default::default()
    };
    for (line, row) in reader.deserialize::<RosterRow>().enumerate() {
        let row = row.with_context(|| format!("{}: bad roster row {}", path.display(), line + 2))?;
        let pitcher = row.is_pitcher();
        let player = row.into_player(team)?;
        if pitcher {
            roster.pitchers.push(player);
        } else {
            roster.batters.push(player);
        }
    }
    debug!(
        team,
        batters = roster.batters.len(),
        pitchers = roster.pitchers.len(),
        "roster loaded"
    );
    Ok(roster)
}

// ========== Teams ==========

/// Team metadata and park factors from the teams file.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMeta {
    pub abbrev: String,
    pub name: String,
    #[serde(default)]
    pub stadium: String,
    pub single_factor: f64,
    pub double_factor: f64,
    pub triple_factor: f64,
    pub homerun_factor: f64,
    pub gbfb_factor: f64,
}

impl TeamMeta {
    pub fn park_factors(&self) -> ParkFactors {
        let mut park = ParkFactors::neutral(&self.abbrev);
        park.stadium = self.stadium.clone();
        for (key, f) in [
            (RateKey::Sl, self.single_factor),
            (RateKey::Dl, self.double_factor),
            (RateKey::Tl, self.triple_factor),
            (RateKey::Hr, self.homerun_factor),
        ] {
            if f.is_finite() && f > 0.0 {
                park.factors.set(key, f);
            } else {
                warn!(team = %self.abbrev, key = %key, factor = f, "ignoring park factor");
            }
        }
        park.set_gbfb_factor(self.gbfb_factor);
        park
    }
}

/// Loads the teams CSV keyed by abbreviation:
/// `abbrev,name,stadium,single_factor,double_factor,triple_factor,homerun_factor,gbfb_factor`.
pub fn load_teams(path: &Path) -> Result<FxHashMap<String, TeamMeta>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open teams CSV: {}", path.display()))?;

    let mut teams = FxHashMap::default();
    for (line, row) in reader.deserialize::<TeamMeta>().enumerate() {
        let meta = row.with_context(|| format!("{}: bad team row {}", path.display(), line + 2))?;
        teams.insert(meta.abbrev.clone(), meta);
    }
    Ok(teams)
}

// ========== League + config ==========

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Loads league averages from YAML, or JSON when the file ends in `.json`.
pub fn load_league(path: &Path) -> Result<LeagueContext> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read league file: {}", path.display()))?;
    let league: LeagueContext = if is_json(path) {
        serde_json::from_str(&text).context("Failed to parse league JSON")?
    } else {
        serde_yaml::from_str(&text).context("Failed to parse league YAML")?
    };
    for key in RateKey::REQUIRED {
        if league.rates.get(key).is_none() {
            bail!("{}: league rates missing {}", path.display(), key);
        }
    }
    Ok(league)
}

/// Loads and validates a simulation config (YAML, or JSON by extension).
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = if is_json(path) {
        SimConfig::from_json_str(&text)
    } else {
        SimConfig::from_yaml_str(&text)
    };
    config.with_context(|| format!("Invalid config: {}", path.display()))
}

/// Loads `abbrev` from `<rosters>/<abbrev>.csv` with its metadata.
pub fn load_team(rosters: &Path, teams: &FxHashMap<String, TeamMeta>, abbrev: &str) -> Result<Team> {
    let meta = teams
        .get(abbrev)
        .with_context(|| format!("Unknown team: {}", abbrev))?;
    let path: PathBuf = rosters.join(format!("{}.csv", abbrev));
    load_roster(&path, abbrev)?.into_team(meta)
}
