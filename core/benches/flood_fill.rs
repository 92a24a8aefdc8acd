use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sapper_core::*;
use std::hint::black_box;

fn open_empty_board(c: &mut Criterion) {
    c.bench_function("open 255x255 empty", |b| {
        b.iter_batched(
            || Board::from_mine_coords((255, 255), &[]).unwrap(),
            |mut board| black_box(board.make_move(Move::open(127, 127)).unwrap()),
            BatchSize::LargeInput,
        )
    });
}

fn generate_expert(c: &mut Criterion) {
    let config = GameConfig::expert();
    let mut seed = 0;
    c.bench_function("first move on expert", |b| {
        b.iter_batched(
            || {
                seed += 1;
                let generator = RandomMinefieldGenerator::new(seed, SafeZone::Neighborhood);
                Board::new(generator, config.size.0, config.size.1, config.mines).unwrap()
            },
            |mut board| black_box(board.make_move(Move::open(15, 8)).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, open_empty_board, generate_expert);
criterion_main!(benches);
