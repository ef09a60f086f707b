// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chessington::core::{self, Player};
use chessington::movegen;
use chessington::Position;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("queen-open-board", |b| {
        let pos = Position::from_placement("8/8/8/8/3Q4/8/8/8").unwrap();
        let queen = pos.piece_id_at(core::D4).unwrap();
        b.iter(|| movegen::available_moves(black_box(queen), black_box(&pos)).unwrap());
    });

    c.bench_function("pawn-start-row", |b| {
        let pos = Position::from_start_position();
        let pawn = pos.piece_id_at(core::E2).unwrap();
        b.iter(|| movegen::available_moves(black_box(pawn), black_box(&pos)).unwrap());
    });

    c.bench_function("kiwipete-movegen-all", |b| {
        let pos = Position::from_placement(KIWIPETE).unwrap();
        b.iter(|| {
            let mut moves = Vec::new();
            movegen::generate_moves(black_box(Player::White), black_box(&pos), &mut moves);
            moves
        });
    });

    c.bench_function("kiwipete-movegen-quiet", |b| {
        let pos = Position::from_placement(KIWIPETE).unwrap();
        b.iter(|| {
            let mut moves = Vec::new();
            movegen::generate_moves(black_box(Player::White), black_box(&pos), &mut moves);
            moves.retain(|m| m.is_quiet());
            moves
        });
    });

    c.bench_function("placement-parse", |b| {
        b.iter(|| Position::from_placement(black_box(KIWIPETE)).unwrap());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
