//! World generation benchmarks
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};

use skerry_core::components::Vec2;
use skerry_core::generation::{build_world, WorldConfig};
use skerry_core::noise::NoiseField;
use skerry_core::pathfinding::RouteTree;

fn bench_config() -> WorldConfig {
    WorldConfig {
        seed: 1234,
        extent: Vec2::new(80.0, 80.0),
        step: 0.5,
        min_island_area: 20.0,
        ..Default::default()
    }
}

fn bench_build_world(c: &mut Criterion) {
    let config = bench_config();
    let noise = NoiseField::new(config.noise_params());

    c.bench_function("build_world 80x80", |b| {
        b.iter(|| build_world(&noise, &config, None))
    });
}

fn bench_route_trees(c: &mut Criterion) {
    let config = bench_config();
    let noise = NoiseField::new(config.noise_params());
    let built = build_world(&noise, &config, None);

    c.bench_function("route_trees 80x80", |b| {
        b.iter(|| {
            for island in &built.islands {
                let _ = RouteTree::build(&built.grid, island);
            }
        })
    });
}

fn bench_noise_field(c: &mut Criterion) {
    let config = bench_config();
    let noise = NoiseField::new(config.noise_params());

    c.bench_function("noise 10k samples", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..100 {
                for j in 0..100 {
                    sum += noise.height(Vec2::new(i as f32 * 0.8, j as f32 * 0.8));
                }
            }
            sum
        })
    });
}

criterion_group!(benches, bench_build_world, bench_route_trees, bench_noise_field);
criterion_main!(benches);
