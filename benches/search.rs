//! 搜索性能基准
//!
//! 固定中局局面，衡量走法生成、评估和完整搜索的吞吐。

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xiangqi_engine::{eval, Board, Color, Difficulty, Move, SearchEngine};

/// 双方各出动子力后的典型中局
fn midgame_board() -> Board {
    let mut board = Board::new();
    for s in ["h3e3", "h10g8", "h1g3", "c10e8", "i1h1", "i10h10"] {
        let mv = Move::parse(s).unwrap();
        assert!(board.make_move(&mv), "setup move {}", s);
    }
    board
}

fn bench_move_generation(c: &mut Criterion) {
    let board = midgame_board();
    c.bench_function("generate_legal_moves", |b| {
        b.iter(|| black_box(&board).generate_legal_moves(Color::Red))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let board = midgame_board();
    c.bench_function("evaluate", |b| b.iter(|| eval::evaluate(black_box(&board))));
}

fn bench_search(c: &mut Criterion) {
    let board = midgame_board();
    let mut engine = SearchEngine::with_difficulty(Difficulty::Easy);
    engine.set_randomness(0.0);
    engine.set_seed(1);
    engine.set_time_limit(60.0);

    c.bench_function("search_depth_2", |b| {
        b.iter(|| engine.get_best_move(black_box(&board), Color::Red))
    });
}

criterion_group!(benches, bench_move_generation, bench_evaluate, bench_search);
criterion_main!(benches);
