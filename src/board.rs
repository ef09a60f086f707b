// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The interface between move generation and whatever stores the pieces. Move generation only ever reads a board
//! through [`Board`]; relocating a piece is the single mutation it asks for, through [`BoardMut`].

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::{Piece, Player, Square, SquareSet};

/// A handle to one particular piece, handed out by the board when the piece is placed. Two white pawns are the same
/// [`Piece`] but never share a `PieceId`.
///
/// A handle only has meaning on the board that issued it (and on clones of that board). Every other board reports
/// the piece as not present.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    board: u32,
    index: u16,
}

impl PieceId {
    pub(crate) const fn new(board: u32, index: u16) -> PieceId {
        PieceId { board, index }
    }

    /// Tag of the board that issued this handle.
    pub(crate) const fn board(self) -> u32 {
        self.board
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

impl Serialize for PieceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.index)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("square {0} is already occupied")]
    SquareOccupied(Square),
    #[error("no piece on square {0}")]
    EmptySquare(Square),
}

/// Read-only queries over piece placement.
pub trait Board {
    /// Returns the piece standing on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Returns the square the given piece stands on, or `None` if it is not on the board (for example, because it
    /// was captured).
    fn find_piece(&self, piece: PieceId) -> Option<Square>;

    /// All squares occupied by pieces belonging to `player`.
    fn pieces(&self, player: Player) -> SquareSet {
        crate::core::squares()
            .filter(|&sq| matches!(self.piece_at(sq), Some(p) if p.player == player))
            .collect()
    }
}

pub trait BoardMut: Board {
    /// Moves whatever stands on `from` to `to`. A piece already on `to` is captured and leaves the board.
    fn relocate(&mut self, from: Square, to: Square) -> Result<(), BoardError>;
}
