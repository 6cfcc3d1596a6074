use cardinal::board::Position;
use cardinal::moves::perft::perft;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_perft_startpos(c: &mut Criterion) {
    let mut pos = Position::new();
    c.bench_function("perft startpos depth 4", |b| {
        b.iter(|| black_box(perft(&mut pos, 4)))
    });
}

fn bench_perft_kiwipete(c: &mut Criterion) {
    let mut pos = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    c.bench_function("perft kiwipete depth 3", |b| {
        b.iter(|| black_box(perft(&mut pos, 3)))
    });
}

criterion_group!(benches, bench_perft_startpos, bench_perft_kiwipete);
criterion_main!(benches);
