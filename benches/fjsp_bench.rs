//! Criterion benchmarks for u-fjsp.
//!
//! Uses synthetic instances where every operation can run on a random
//! subset of machines, to measure evaluation, neighborhood and full-search
//! cost as the instance grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use u_fjsp::tabu::{NeighborCount, TabuConfig, TabuRunner};
use u_fjsp::{makespan, random_initial_solution, random_neighbor, ProblemInstance};

// ===========================================================================
// Synthetic instance: jobs x ops_per_job operations on `machines` machines
// ===========================================================================

fn synthetic(jobs: usize, ops_per_job: usize, machines: usize) -> ProblemInstance {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let rows = (0..jobs)
        .map(|_| {
            (0..ops_per_job)
                .map(|_| {
                    let forced = rng.random_range(0..machines);
                    (0..machines)
                        .map(|m| {
                            if m == forced || rng.random_bool(0.5) {
                                rng.random_range(1..20)
                            } else {
                                -1
                            }
                        })
                        .collect::<Vec<i64>>()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    ProblemInstance::new(machines, rows).expect("synthetic instance is well formed")
}

const SIZES: [(usize, usize, usize); 3] = [(5, 3, 3), (10, 5, 5), (20, 10, 8)];

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_makespan(c: &mut Criterion) {
    let mut group = c.benchmark_group("makespan");

    for (jobs, ops, machines) in SIZES {
        let problem = synthetic(jobs, ops, machines);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let solution = random_initial_solution(&problem, &mut rng);
        group.bench_with_input(
            BenchmarkId::new(format!("j{}_o{}_m{}", jobs, ops, machines), jobs * ops),
            &(problem, solution),
            |b, (p, s)| b.iter(|| black_box(makespan(black_box(p), black_box(s)))),
        );
    }
    group.finish();
}

fn bench_neighbor(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_neighbor");

    for (jobs, ops, machines) in SIZES {
        let problem = synthetic(jobs, ops, machines);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let solution = random_initial_solution(&problem, &mut rng);
        group.bench_with_input(
            BenchmarkId::from_parameter(jobs * ops),
            &(problem, solution),
            |b, (p, s)| {
                b.iter(|| black_box(random_neighbor(black_box(p), black_box(s), &mut rng)))
            },
        );
    }
    group.finish();
}

fn bench_tabu_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabu_search");
    group.sample_size(10);

    for (jobs, ops, machines) in SIZES {
        let problem = synthetic(jobs, ops, machines);
        let config = TabuConfig::default()
            .with_max_iterations(50)
            .with_tabu_size(20)
            .with_reset_threshold(10)
            .with_neighbors(NeighborCount::Fixed(100))
            .with_timeout(None)
            .with_trace(false)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(jobs * ops),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = TabuRunner::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_makespan, bench_neighbor, bench_tabu_search);
criterion_main!(benches);
