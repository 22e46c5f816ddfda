use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grid2048::core::rng::seeded;
use grid2048::core::{slide_line, Board, FixedClock, GameState};
use grid2048::types::Direction;

fn bench_slide_line(c: &mut Criterion) {
    c.bench_function("slide_line_8", |b| {
        b.iter(|| {
            let mut line = black_box([2u64, 2, 4, 0, 4, 8, 8, 0]);
            slide_line(&mut line, false)
        })
    });
}

fn bench_board_slide(c: &mut Criterion) {
    let rows = vec![
        vec![2, 2, 4, 4],
        vec![0, 8, 8, 16],
        vec![2, 0, 2, 0],
        vec![32, 32, 0, 64],
    ];
    let board = Board::from_rows(&rows).unwrap();

    c.bench_function("board_slide_4x4", |b| {
        b.iter(|| {
            let mut board = board.clone();
            board.slide(black_box(Direction::Left))
        })
    });
}

fn bench_apply_move(c: &mut Criterion) {
    let clock = FixedClock(Default::default());
    let mut rng = seeded(12345);
    let start = GameState::new(4, &mut rng, &clock).unwrap();

    c.bench_function("apply_move_cycle", |b| {
        let mut game = start.clone();
        b.iter(|| {
            for dir in Direction::ALL {
                game.apply_move(dir, &mut rng, &clock);
            }
            if game.is_game_over() {
                game = start.clone();
            }
        })
    });
}

fn bench_game_over_check(c: &mut Criterion) {
    let rows: Vec<Vec<u64>> = (0..8)
        .map(|r| (0..8).map(|c| if (r + c) % 2 == 0 { 2 } else { 4 }).collect())
        .collect();
    let board = Board::from_rows(&rows).unwrap();

    c.bench_function("is_game_over_8x8_full", |b| {
        b.iter(|| black_box(&board).is_game_over())
    });
}

criterion_group!(
    benches,
    bench_slide_line,
    bench_board_slide,
    bench_apply_move,
    bench_game_over_check
);
criterion_main!(benches);
