//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mcts::{rollout, MctsConfig, MctsSearch, MctsTree};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

// =============================================================================
// Full search
// =============================================================================

fn bench_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_iterations");
    let game = games_tictactoe::TicTacToe::new();

    for iterations in [100u32, 250, 500, 1000] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::new("tictactoe", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::default().with_iterations(iterations);

                b.iter(|| {
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    let mut search =
                        MctsSearch::new(&game, games_tictactoe::State::new(), config.clone())
                            .unwrap();
                    black_box(search.run(&mut rng).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_search_connect4(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_connect4");
    let game = games_connect4::Connect4::new();

    for iterations in [100u32, 250, 500] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::new("opening", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::default().with_iterations(iterations);

                b.iter(|| {
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    let mut search =
                        MctsSearch::new(&game, games_connect4::State::new(), config.clone())
                            .unwrap();
                    black_box(search.run(&mut rng).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_game_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_phases");
    let game = games_tictactoe::TicTacToe::new();
    let config = MctsConfig::for_testing();

    // X at 4, O at 0, X at 2, O at 6
    let midgame = games_tictactoe::State::from_moves(&[4, 0, 2, 6]);
    // X can win at 2
    let near_terminal = games_tictactoe::State::from_moves(&[0, 3, 1, 4]);

    for (name, state) in [
        ("opening", games_tictactoe::State::new()),
        ("midgame", midgame),
        ("near_terminal", near_terminal),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                let mut search = MctsSearch::new(&game, state, config.clone()).unwrap();
                black_box(search.run(&mut rng).unwrap())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Building blocks
// =============================================================================

fn bench_rollout(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_rollout");

    group.bench_function("tictactoe", |b| {
        let game = games_tictactoe::TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        b.iter(|| black_box(rollout(&game, games_tictactoe::State::new(), &mut rng, None).unwrap()));
    });

    group.bench_function("connect4", |b| {
        let game = games_connect4::Connect4::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        b.iter(|| black_box(rollout(&game, games_connect4::State::new(), &mut rng, None).unwrap()));
    });

    group.finish();
}

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");

    group.bench_function("select_child", |b| {
        let mut tree: MctsTree<u8, u8> = MctsTree::new(Vec::new());
        for i in 0..9u8 {
            let child = tree.add_child(tree.root(), i, 1, Vec::new());
            for v in 0..(i as u32 + 1) * 10 {
                tree.backpropagate(child, v % 3 != 0);
            }
        }

        b.iter(|| {
            black_box(tree.select_child(tree.root(), &1, 2.0, mcts::tree::ChildFilter::All))
        });
    });

    group.bench_function("backpropagate_depth_9", |b| {
        b.iter_batched(
            || {
                let mut tree: MctsTree<u8, u8> = MctsTree::new(Vec::new());
                let mut parent = tree.root();
                for i in 0..9u8 {
                    parent = tree.add_child(parent, i, i % 2 + 1, Vec::new());
                }
                (tree, parent)
            },
            |(mut tree, leaf)| {
                tree.backpropagate(leaf, true);
                black_box(tree)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_search_iterations,
    bench_search_connect4,
    bench_game_phases,
    bench_rollout,
    bench_tree_operations,
);

criterion_main!(benches);
