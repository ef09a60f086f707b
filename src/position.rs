// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
    sync::atomic::{AtomicU32, Ordering},
};

use thiserror::Error;

use crate::{
    board::{Board, BoardError, BoardMut, PieceId},
    core::*,
};

/// A position, representing where every piece of a game currently stands. Pieces live in an arena owned by the
/// position and are addressed by [`PieceId`]; the 64-entry board maps squares back into the arena.
#[derive(Clone, Debug)]
pub struct Position {
    /// Identifies the handles this position issued. Clones share it, so handles stay valid on a copy.
    tag: u32,
    /// The piece occupying each square, indexed by square.
    board: [Option<PieceId>; 64],
    /// Every piece ever placed on this position, indexed by `PieceId`.
    pieces: Vec<Piece>,
    /// Where each piece currently stands. `None` once a piece has been captured.
    locations: Vec<Option<Square>>,
}

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

impl Position {
    pub fn new() -> Position {
        Position {
            tag: NEXT_TAG.fetch_add(1, Ordering::Relaxed),
            board: [None; 64],
            pieces: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// Places a new piece on an empty square, returning the handle that identifies it from now on.
    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<PieceId, BoardError> {
        if self.board[square.as_u8() as usize].is_some() {
            return Err(BoardError::SquareOccupied(square));
        }

        let id = PieceId::new(self.tag, self.pieces.len() as u16);
        self.pieces.push(piece);
        self.locations.push(Some(square));
        self.board[square.as_u8() as usize] = Some(id);
        Ok(id)
    }

    pub fn piece_id_at(&self, square: Square) -> Option<PieceId> {
        self.board[square.as_u8() as usize]
    }

    /// Returns the piece behind a handle, whether or not it is still on the board.
    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        if id.board() != self.tag {
            return None;
        }

        self.pieces.get(id.index()).copied()
    }

    pub fn occupied(&self) -> SquareSet {
        squares()
            .filter(|sq| self.board[sq.as_u8() as usize].is_some())
            .collect()
    }
}

impl Board for Position {
    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.piece_id_at(square).map(|id| self.pieces[id.index()])
    }

    fn find_piece(&self, piece: PieceId) -> Option<Square> {
        if piece.board() != self.tag {
            return None;
        }

        self.locations.get(piece.index()).copied().flatten()
    }
}

impl BoardMut for Position {
    fn relocate(&mut self, from: Square, to: Square) -> Result<(), BoardError> {
        let moving = self.piece_id_at(from).ok_or(BoardError::EmptySquare(from))?;
        if from == to {
            return Ok(());
        }

        if let Some(captured) = self.board[to.as_u8() as usize] {
            tracing::debug!(piece = %captured, square = %to, "piece captured");
            self.locations[captured.index()] = None;
        }

        self.board[from.as_u8() as usize] = None;
        self.board[to.as_u8() as usize] = Some(moving);
        self.locations[moving.index()] = Some(to);
        Ok(())
    }
}

//
// The routines in this block are oriented around the piece-placement field of FEN, a simple notation for chess
// positions. Positions can be created by parsing a placement and a placement can be produced from any position.
//

/// Possible errors that can arise when parsing a FEN piece placement into a `Position`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum PlacementParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
}

const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_placement(START_PLACEMENT).expect("start placement is valid")
    }

    /// Constructs a new position from the piece-placement field of a FEN record. Anything after the first
    /// whitespace (side to move, castling rights and so on) is ignored, so complete FEN records are accepted too.
    pub fn from_placement(placement: impl AsRef<str>) -> Result<Position, PlacementParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), PlacementParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(PlacementParseError::UnexpectedChar(c)),
                None => Err(PlacementParseError::UnexpectedEnd),
            }
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, PlacementParseError> {
            iter.peek().copied().ok_or(PlacementParseError::UnexpectedEnd)
        }

        let mut pos = Position::new();
        let iter = &mut placement.as_ref().trim_start().chars().peekable();
        for row in (0..8).rev() {
            let mut col = 0;
            while col <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if let Some(value) = c.to_digit(10) {
                    if !(1..=8).contains(&value) {
                        return Err(PlacementParseError::InvalidDigit);
                    }

                    col += value as i32;
                    if col > 8 {
                        return Err(PlacementParseError::FileDoesNotSumToEight);
                    }

                    iter.next();
                    continue;
                }

                if c == '/' || c.is_whitespace() {
                    return Err(PlacementParseError::FileDoesNotSumToEight);
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| PlacementParseError::UnknownPiece(c))?;
                let square = Square::at(row, col).expect("row and col are kept in range by the loop");
                pos.add_piece(square, piece).expect("each square is visited exactly once");
                iter.next();
                col += 1;
            }

            if row != 0 {
                eat(iter, '/')?;
            }
        }

        match iter.next() {
            None => Ok(pos),
            Some(c) if c.is_whitespace() => Ok(pos),
            Some(c) => Err(PlacementParseError::UnexpectedChar(c)),
        }
    }

    pub fn as_placement(&self) -> String {
        let mut buf = String::new();
        for row in (0..8).rev() {
            let mut empty_squares = 0;
            for col in 0..8 {
                let square = Square::at(row, col).expect("row and col are on the board");
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if row != 0 {
                buf.push('/');
            }
        }

        buf
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                let sq = Square::at(row, col).map_err(|_| fmt::Error)?;
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", row + 1)?;
        }

        writeln!(f, "{}", "---".repeat(8))?;
        for file in 'a'..='h' {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
