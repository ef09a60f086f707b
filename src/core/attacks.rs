// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Board geometry for each piece kind, ignoring occupancy. Every square produced here is on the board; clipping at
//! the edges happens once, when the tables are built.

use crate::core::*;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// For every square, the set of squares reachable by applying each of a fixed list of offsets.
struct StepTable {
    table: [SquareSet; 64],
}

impl StepTable {
    fn new(offsets: &[(i32, i32)]) -> StepTable {
        let mut st = StepTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            st.table[sq.0 as usize] = offsets
                .iter()
                .filter_map(|&(drow, dcol)| sq.offset(drow, dcol))
                .collect();
        }

        st
    }

    fn steps(&self, sq: Square) -> SquareSet {
        self.table[sq.0 as usize]
    }
}

struct PawnTable {
    table: [[SquareSet; 2]; 64],
}

impl PawnTable {
    fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[SquareSet::empty(); 2]; 64],
        };

        for sq in squares() {
            for player in players() {
                let up = player.forward();
                // On the far rank both offsets fall off the board and the entry stays empty.
                pt.table[sq.0 as usize][player as usize] = [-1, 1]
                    .iter()
                    .filter_map(|&dcol| sq.offset(up, dcol))
                    .collect();
            }
        }

        pt
    }

    fn attacks(&self, sq: Square, player: Player) -> SquareSet {
        self.table[sq.0 as usize][player as usize]
    }
}

lazy_static::lazy_static! {
    static ref KNIGHT_TABLE: StepTable = StepTable::new(&KNIGHT_OFFSETS);
    static ref KING_TABLE: StepTable = StepTable::new(&KING_OFFSETS);
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
}

/// Squares a knight on `sq` could jump to on an empty board.
pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.steps(sq)
}

/// Squares adjacent to `sq`.
pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.steps(sq)
}

/// The diagonally-forward squares a pawn of `player` on `sq` could capture on.
pub fn pawn_attacks(sq: Square, player: Player) -> SquareSet {
    PAWN_TABLE.attacks(sq, player)
}

/// Walks from a square towards the edge of the board in one direction, not including the starting square.
pub struct Ray {
    cursor: Square,
    dir: Direction,
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.cursor.towards(self.dir)?;
        self.cursor = next;
        Some(next)
    }
}

pub fn ray(sq: Square, dir: Direction) -> Ray {
    Ray { cursor: sq, dir }
}
