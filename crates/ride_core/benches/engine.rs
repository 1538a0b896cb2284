use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ride_core::fare::{FareConfig, RideMode};
use ride_core::matching::{match_drivers, DriverProfile, MatchConstraints, SortKey};

fn synthetic_pool(size: usize) -> Vec<DriverProfile> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|i| {
            let mode = RideMode::ALL[i % RideMode::ALL.len()];
            let rating = rng.gen_range(3.5..5.0);
            DriverProfile {
                id: format!("drv-{i:05}"),
                name: format!("Driver {i}"),
                mode,
                rating,
                customer_score: rng.gen_range(3.5..5.0),
                safety_score: rng.gen_range(3.5..5.0),
                driving_score: rng.gen_range(3.5..5.0),
                vehicle_condition: rng.gen_range(3.5..5.0),
                distance_km: rng.gen_range(0.2..8.0),
                trips: rng.gen_range(50..3_000),
                badge: String::new(),
            }
        })
        .collect()
}

fn bench_match_drivers(c: &mut Criterion) {
    let pool = synthetic_pool(5_000);
    let constraints = MatchConstraints {
        max_distance_km: 4.0,
        min_rating: 4.2,
        min_vehicle_condition: 4.0,
        sort_key: SortKey::Safety,
    };
    c.bench_function("match_drivers_5k_pool", |b| {
        b.iter(|| match_drivers(black_box(&pool), RideMode::Car, black_box(&constraints)))
    });
}

fn bench_fare_estimate(c: &mut Criterion) {
    let config = FareConfig::default();
    c.bench_function("fare_estimate", |b| {
        b.iter(|| config.estimate(black_box(RideMode::Ev), black_box(7.3)))
    });
}

criterion_group!(benches, bench_match_drivers, bench_fare_estimate);
criterion_main!(benches);
