//! Benchmarks for IgniteDB core operations.
//!
//! Run with: `cargo bench`
//!
//! Performance targets:
//! - `open()` < 100ms for a new store
//! - `open()` < 150ms with the demo seed
//! - `startups()` < 5ms on a settled store
//! - `check_create_listing()` < 10ms against 100 owned listings

use criterion::{criterion_group, criterion_main, Criterion};
use ignitedb::{Config, IgniteDb, NewStartup, PlanTier, ProjectType, UserId};
use tempfile::tempdir;

fn new_listing(owner: &UserId, name: &str) -> NewStartup {
    NewStartup {
        owner_id: owner.clone(),
        name: name.to_string(),
        description: "Benchmark listing.".to_string(),
        project_type: ProjectType::Individual,
        category: None,
        stage: None,
        funding_target: 10_000,
        tags: Vec::new(),
        image: None,
    }
}

/// Benchmark opening a new store.
fn bench_open_new(c: &mut Criterion) {
    c.bench_function("open_new_store", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let dir = tempdir().unwrap();
                let path = dir.path().join("bench.redb");

                let start = std::time::Instant::now();
                let db = IgniteDb::open(&path, Config::default()).unwrap();
                total += start.elapsed();

                db.close().unwrap();
            }

            total
        });
    });
}

/// Benchmark opening with the demo seed (first run of a showcase build).
fn bench_open_seeded(c: &mut Criterion) {
    c.bench_function("open_with_demo_seed", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let dir = tempdir().unwrap();
                let path = dir.path().join("bench.redb");

                let start = std::time::Instant::now();
                let db = IgniteDb::open(&path, Config::with_demo_seed()).unwrap();
                total += start.elapsed();

                db.close().unwrap();
            }

            total
        });
    });
}

/// Benchmark a typed read once migration has settled.
fn bench_read_startups(c: &mut Criterion) {
    let db = IgniteDb::open_in_memory(Config::with_demo_seed()).unwrap();
    // First read performs any outstanding write-back; the bench measures
    // the steady state.
    db.startups().unwrap();

    c.bench_function("read_startups_settled", |b| {
        b.iter(|| db.startups().unwrap());
    });
}

/// Benchmark the entitlement check against a store with many listings.
fn bench_check_create_listing(c: &mut Criterion) {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();
    let founder = UserId::new("bench-founder");
    db.subscribe(&founder, PlanTier::ProPlus, None).unwrap();
    for i in 0..100 {
        db.create_startup(new_listing(&founder, &format!("Listing {}", i)))
            .unwrap();
    }

    c.bench_function("check_create_listing_100", |b| {
        b.iter(|| db.check_create_listing(&founder).unwrap());
    });
}

/// Benchmark one listing creation on a fresh store.
fn bench_create_startup(c: &mut Criterion) {
    c.bench_function("create_startup", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for i in 0..iters {
                let db = IgniteDb::open_in_memory(Config::default()).unwrap();
                let founder = UserId::new("bench-founder");
                let listing = new_listing(&founder, &format!("Listing {}", i));

                let start = std::time::Instant::now();
                db.create_startup(listing).unwrap();
                total += start.elapsed();
            }

            total
        });
    });
}

criterion_group!(
    benches,
    bench_open_new,
    bench_open_seeded,
    bench_read_startups,
    bench_check_create_listing,
    bench_create_startup
);
criterion_main!(benches);
