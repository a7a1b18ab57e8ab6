//! Criterion benchmarks for strip packing decoders and searches.
//!
//! Instances are generated from a fixed seed so runs are comparable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_strip::ga::GaConfig;
use u_strip::heuristic::{HeuristicConfig, HeuristicSolver, Policy};
use u_strip::model::{Instance, Rectangle};
use u_strip::random::create_rng;
use u_strip::search::{Decoder, HeuristicDecoder, MetaheuristicSolver, Strategy};

fn random_instance(n: usize, width: i64, kerf: i64) -> Instance {
    let mut rng = create_rng(42);
    let rects = (0..n)
        .map(|i| {
            Rectangle::new(
                i as u32 + 1,
                rng.random_range(1..=width / 2),
                rng.random_range(1..=width / 3),
            )
        })
        .collect();
    Instance::new(width, rects)
        .and_then(|inst| inst.with_kerf(kerf))
        .expect("valid benchmark instance")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_heuristic(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic");
    for &n in &[20usize, 100, 500] {
        let instance = random_instance(n, 100, 1);
        for policy in [Policy::Shelf, Policy::Skyline] {
            let config = HeuristicConfig::default().with_policy(policy);
            group.bench_with_input(
                BenchmarkId::new(format!("{policy:?}"), n),
                &(instance.clone(), config),
                |b, (inst, cfg)| b.iter(|| HeuristicSolver::solve(black_box(inst), black_box(cfg))),
            );
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &n in &[20usize, 100, 500] {
        let instance = random_instance(n, 100, 0);
        let order: Vec<usize> = (0..n).rev().collect();
        let flips: Vec<bool> = (0..n).map(|i| i % 3 == 0).collect();
        for policy in [Policy::Shelf, Policy::Skyline] {
            let decoder = HeuristicDecoder::new(policy);
            group.bench_with_input(
                BenchmarkId::new(decoder.tag().to_string(), n),
                &instance,
                |b, inst| {
                    b.iter(|| decoder.decode(black_box(inst), black_box(&order), &flips, true))
                },
            );
        }
    }
    group.finish();
}

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_skyline");
    group.sample_size(10);
    for (n, pop, gen) in [(20usize, 30usize, 20usize), (60, 40, 10)] {
        let instance = random_instance(n, 50, 0);
        let strategy = Strategy::Ga(
            GaConfig::default()
                .with_population_size(pop)
                .with_max_generations(gen)
                .with_seed(42),
        );
        let solver = MetaheuristicSolver::new(true);
        group.bench_with_input(
            BenchmarkId::new(format!("p{pop}_g{gen}"), n),
            &(instance, strategy),
            |b, (inst, s)| {
                b.iter(|| {
                    let result = solver.solve(black_box(inst), black_box(s));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_heuristic, bench_decode, bench_ga);
criterion_main!(benches);
