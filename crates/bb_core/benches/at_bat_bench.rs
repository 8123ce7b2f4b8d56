use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bb_core::engine::at_bat::Situation;
use bb_core::engine::bases::Occupancy;
use bb_core::engine::config::PoolConfig;
use bb_core::engine::distribution::MatchupContext;
use bb_core::{
    build_outcome_vector, sample_outcome, AtBatDriver, BaseState, Bats, GameRng, GameSimulator,
    LeagueContext, ParkFactors, Player, RateKey, RateTable, ResolverRegistry, SimConfig, Team,
    Throws,
};

fn rates() -> RateTable {
    RateTable::from_pairs(&[
        (RateKey::So, 0.24),
        (RateKey::Bb, 0.09),
        (RateKey::Hp, 0.01),
        (RateKey::Hr, 0.04),
        (RateKey::Ih, 0.02),
        (RateKey::Sl, 0.15),
        (RateKey::Dl, 0.05),
        (RateKey::Tl, 0.005),
        (RateKey::Babip, 0.30),
        (RateKey::GbFb, 0.9),
    ])
}

fn batter(id: u32) -> Player {
    Player::new(id, "BEN", "Bench", "Batter")
        .with_hands(Bats::L, Throws::R)
        .with_batting(rates())
}

fn pitcher(id: u32) -> Player {
    Player::new(id, "BEN", "Bench", "Pitcher")
        .with_hands(Bats::R, Throws::R)
        .with_pitching(rates())
}

fn team(abbrev: &str, base: u32) -> Team {
    let lineup = (1..=9).map(|i| batter(base + i)).collect();
    Team::new(abbrev, abbrev, lineup, pitcher(base + 50), ParkFactors::neutral(abbrev))
}

fn bench_matchup(c: &mut Criterion) {
    let league = LeagueContext::modern();
    let park = ParkFactors::neutral("BEN");
    let (b, p) = (batter(1), pitcher(2));
    let ctx = MatchupContext::neutral(&league, &park);
    let mut outcome_rng = ChaCha8Rng::seed_from_u64(1);
    let mut contact_rng = ChaCha8Rng::seed_from_u64(2);

    let mut group = c.benchmark_group("matchup");
    group.throughput(Throughput::Elements(1));
    group.bench_function("build_vector", |bench| {
        bench.iter(|| build_outcome_vector(black_box(&b), black_box(&p), &ctx))
    });
    let vector = build_outcome_vector(&b, &p, &ctx).unwrap();
    group.bench_function("sample", |bench| {
        bench.iter(|| sample_outcome(black_box(&vector), &mut outcome_rng, &mut contact_rng))
    });
    group.finish();
}

fn bench_at_bat(c: &mut Criterion) {
    let config = SimConfig::default();
    let registry = ResolverRegistry::standard();
    let driver = AtBatDriver::new(&config, &registry);
    let league = LeagueContext::modern();
    let park = ParkFactors::neutral("BEN");
    let lineup = vec![batter(1)];
    let p = pitcher(2);
    let mut rng = GameRng::new(7, &PoolConfig::default());
    let mut pooled = GameRng::new(7, &PoolConfig { enabled: true, size: 1 << 14 });
    let bases = BaseState::with_occupancy(Occupancy::FIRST_THIRD);

    let mut group = c.benchmark_group("at_bat");
    group.throughput(Throughput::Elements(1));
    group.bench_function("live", |bench| {
        bench.iter(|| {
            driver.play(&lineup[0], &p, &league, &park, Situation::new(bases, 1, &lineup), &mut rng)
        })
    });
    group.bench_function("pooled", |bench| {
        bench.iter(|| {
            driver.play(&lineup[0], &p, &league, &park, Situation::new(bases, 1, &lineup), &mut pooled)
        })
    });
    group.finish();
}

fn bench_game(c: &mut Criterion) {
    let sim = GameSimulator::new(SimConfig::default(), LeagueContext::modern()).unwrap();
    let (away, home) = (team("AWY", 100), team("HOM", 200));
    let mut seed = 0u64;
    c.bench_function("game/full", |bench| {
        bench.iter(|| {
            seed += 1;
            sim.simulate_game(&away, &home, seed)
        })
    });
}

criterion_group!(benches, bench_matchup, bench_at_bat, bench_game);
criterion_main!(benches);
