//! Benchmarks for the per-frame simulation step.
//!
//! The frame budget at 60 FPS is 16.6 ms; these measure how much of it the
//! simulation core uses at different swarm sizes.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use handswarm::game::{Bounds, classify};
use handswarm::input::{HandPose, SweepSource, synthesize};
use handswarm::{GameConfig, Simulation, run_headless};

fn config(particles: usize) -> GameConfig {
    GameConfig {
        particles,
        seed: 42,
        ..GameConfig::default()
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for particles in [100, 300, 1000] {
        let config = config(particles);
        let hand = synthesize(HandPose::Pinch, config.bounds().center(), config.bounds());
        group.bench_with_input(BenchmarkId::from_parameter(particles), &config, |b, config| {
            let mut sim = Simulation::new(config);
            b.iter(|| black_box(sim.tick(black_box(Some(&hand)))));
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let bounds = Bounds::new(1280.0, 720.0);
    let hand = synthesize(HandPose::Open, bounds.center(), bounds);

    c.bench_function("classify_open_palm", |b| {
        b.iter(|| black_box(classify(black_box(Some(&hand)), bounds)));
    });
}

fn bench_headless_session(c: &mut Criterion) {
    // One minute of play at 60 FPS
    let config = config(300);

    c.bench_function("headless_3600_frames", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(black_box(&config));
            let mut source = SweepSource::new(config.bounds());
            black_box(run_headless(&mut sim, &mut source, 3600))
        });
    });
}

criterion_group!(benches, bench_tick, bench_classify, bench_headless_session);
criterion_main!(benches);
