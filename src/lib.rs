// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `chessington` computes where chess pieces may move.
//!
//! Given a piece and a board, [`movegen::available_moves`] produces the set of destination squares allowed by that
//! piece's movement geometry and the basic capture rules. There is no check detection, castling,
//! en-passant or promotion. Boards are anything implementing [`board::Board`]; [`Position`] is the implementation
//! that ships with the crate.

pub mod board;
pub mod core;
pub mod movegen;
pub mod position;

pub use board::{Board, BoardMut, PieceId};
pub use position::Position;
