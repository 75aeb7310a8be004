//! 走法生成和搜索的基准测试

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xiangqi_bots::{build_agent, evaluate, AgentConfig, Board, Color, MctsConfig};

fn bench_move_generation(c: &mut Criterion) {
    let board = Board::new();

    c.bench_function("actions_for_opening", |b| {
        b.iter(|| black_box(board.actions_for(Color::Red)))
    });
}

fn bench_clone_and_apply(c: &mut Criterion) {
    let board = Board::new();
    let actions = board.actions_for(Color::Red).unwrap_or_default();

    c.bench_function("clone_and_apply_all", |b| {
        b.iter(|| {
            for action in &actions {
                let mut sim = board.clone();
                black_box(sim.apply(action).ok());
            }
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let board = Board::new();

    c.bench_function("evaluate_opening", |b| {
        b.iter(|| black_box(evaluate(&board, Color::Red)))
    });
}

fn bench_minimax(c: &mut Criterion) {
    let board = Board::new();
    let config = AgentConfig {
        depth: 2,
        ..Default::default()
    };

    c.bench_function("minimax_depth_2", |b| {
        b.iter(|| {
            let mut agent = build_agent("minimax", Color::Red, &config).ok();
            black_box(agent.as_mut().map(|a| a.choose_move(&board).ok()))
        })
    });
}

fn bench_mcts(c: &mut Criterion) {
    let board = Board::new();
    let config = AgentConfig {
        seed: Some(1),
        mcts: MctsConfig {
            expansions: 20,
            rollouts: 10,
            ..Default::default()
        },
        ..Default::default()
    };

    c.bench_function("mcts_20x10", |b| {
        b.iter(|| {
            let mut agent = build_agent("mcts", Color::Red, &config).ok();
            black_box(agent.as_mut().map(|a| a.choose_move(&board).ok()))
        })
    });
}

criterion_group!(
    benches,
    bench_move_generation,
    bench_clone_and_apply,
    bench_evaluate,
    bench_minimax,
    bench_mcts,
);
criterion_main!(benches);
