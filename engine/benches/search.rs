//! Criterion benchmarks for search, verification and snapshots
//!
//! Uses the largest tree the practice UI offers (depth 5, branching 4).

use abprune_engine::lifecycle::reveal_solution;
use abprune_engine::node::{GameTree, Side};
use abprune_engine::search::{minimax, solve};
use abprune_engine::snapshot::serialize;
use abprune_engine::verify::check;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn largest_tree(seed: u64) -> GameTree {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let leaves: Vec<i32> = (0..256).map(|_| rng.gen_range(-20..=20)).collect();
    GameTree::from_leaves(Side::Max, 5, 4, &leaves).unwrap()
}

fn benchmark_solve(c: &mut Criterion) {
    let tree = largest_tree(12345);
    c.bench_function("alpha_beta_solve_d5_b4", |b| b.iter(|| solve(black_box(&tree))));
    c.bench_function("minimax_d5_b4", |b| b.iter(|| minimax(black_box(&tree))));
}

fn benchmark_check(c: &mut Criterion) {
    let mut tree = largest_tree(12345);
    reveal_solution(&mut tree);
    c.bench_function("check_revealed_d5_b4", |b| b.iter(|| check(black_box(&tree))));
}

fn benchmark_reveal(c: &mut Criterion) {
    c.bench_function("reveal_solution_d5_b4", |b| {
        b.iter_batched(
            || largest_tree(777),
            |mut tree| {
                reveal_solution(&mut tree);
                black_box(tree.len())
            },
            BatchSize::SmallInput,
        )
    });
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut tree = largest_tree(12345);
    reveal_solution(&mut tree);
    c.bench_function("serialize_d5_b4", |b| b.iter(|| serialize(black_box(&tree))));
}

criterion_group!(
    benches,
    benchmark_solve,
    benchmark_check,
    benchmark_reveal,
    benchmark_serialize,
);
criterion_main!(benches);
