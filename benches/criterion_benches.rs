use criterion::{black_box, criterion_group, criterion_main, Criterion};

use multi_sokoban_solver::config::{SearchConfig, Strategy, SuccessorOrder};
use multi_sokoban_solver::{LoadLevel, Solve};

// allowing unused so i can bench just one or few
// and still notice other warnings if there are any
#[allow(unused)]
fn bench_two_agents(c: &mut Criterion) {
    bench_level(c, Strategy::Bfs, "levels/04-two-agents.txt", 100);
}

#[allow(unused)]
fn bench_two_agents_astar(c: &mut Criterion) {
    bench_level(c, Strategy::AStar, "levels/04-two-agents.txt", 100);
}

#[allow(unused)]
fn bench_three_agents(c: &mut Criterion) {
    // each expansion tries up to a few hundred joint actions
    bench_level(c, Strategy::Bfs, "levels/07-three-agents.txt", 10);
}

#[allow(unused)]
fn bench_three_agents_greedy(c: &mut Criterion) {
    bench_level(c, Strategy::Greedy, "levels/07-three-agents.txt", 50);
}

fn bench_level(c: &mut Criterion, strategy: Strategy, level_path: &str, samples: usize) {
    let level = level_path.load_level().unwrap();
    let config = SearchConfig {
        successor_order: SuccessorOrder::Fixed,
        ..SearchConfig::new(strategy)
    };

    let mut group = c.benchmark_group(strategy.to_string());
    group.sample_size(samples);
    group.bench_function(level_path, |b| {
        b.iter(|| black_box(level.solve(black_box(&config))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_two_agents,
    bench_two_agents_astar,
    bench_three_agents,
    //bench_three_agents_greedy,
);
criterion_main!(benches);
