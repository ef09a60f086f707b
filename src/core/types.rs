// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Returned when a square is requested with a row or column outside of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("square out of range: row {row}, col {col}")]
pub struct InvalidSquare {
    pub row: i32,
    pub col: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareParseError {
    #[error("square index out of range: {0}")]
    OutOfRange(u8),
    #[error("invalid char: {0}")]
    InvalidChar(char),
    #[error("expected two characters, got {0:?}")]
    InvalidLength(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown player: {0:?}")]
pub struct PlayerParseError(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard, addressed by row (0 is White's back rank) and column (0 is the a-file).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(in crate::core) u8);

impl Square {
    /// Creates the square at the given row and column, rejecting anything that is not on the board.
    pub const fn at(row: i32, col: i32) -> Result<Square, InvalidSquare> {
        if row < 0 || row > 7 || col < 0 || col > 7 {
            return Err(InvalidSquare { row, col });
        }

        Ok(Square((row * 8 + col) as u8))
    }

    pub const fn row(self) -> u8 {
        self.0 >> 3
    }

    pub const fn col(self) -> u8 {
        self.0 & 7
    }

    /// Returns the square `drow` rows and `dcol` columns away from this one, or `None` if that would leave the
    /// board.
    pub const fn offset(self, drow: i32, dcol: i32) -> Option<Square> {
        match Square::at(self.row() as i32 + drow, self.col() as i32 + dcol) {
            Ok(sq) => Some(sq),
            Err(_) => None,
        }
    }

    /// Returns the adjacent square in the given direction, if there is one.
    pub const fn towards(self, dir: Direction) -> Option<Square> {
        let (drow, dcol) = dir.as_vector();
        self.offset(drow, dcol)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 64 {
            return Err(SquareParseError::OutOfRange(value));
        }

        Ok(Square(value))
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(SquareParseError::InvalidLength(s.to_owned())),
        };

        let col = match file {
            'a'..='h' => file as i32 - 'a' as i32,
            c => return Err(SquareParseError::InvalidChar(c)),
        };
        let row = match rank {
            '1'..='8' => rank as i32 - '1' as i32,
            c => return Err(SquareParseError::InvalidChar(c)),
        };

        // Both coordinates were range-checked by the char patterns above.
        Ok(Square((row * 8 + col) as u8))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col()) as char;
        let rank = (b'1' + self.row()) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

// Internal rules come first so the public rule never tries to parse `@emit` as an expression.
macro_rules! row_of_squares {
    (@emit $row:expr, $col:expr; $name:ident $(, $rest:ident)*) => {
        pub const $name: Square = Square($row * 8 + $col);
        row_of_squares!(@emit $row, $col + 1; $($rest),*);
    };
    (@emit $row:expr, $col:expr;) => {};
    ($row:expr; $($name:ident),+) => {
        row_of_squares!(@emit $row, 0u8; $($name),+);
    };
}

row_of_squares!(0; A1, B1, C1, D1, E1, F1, G1, H1);
row_of_squares!(1; A2, B2, C2, D2, E2, F2, G2, H2);
row_of_squares!(2; A3, B3, C3, D3, E3, F3, G3, H3);
row_of_squares!(3; A4, B4, C4, D4, E4, F4, G4, H4);
row_of_squares!(4; A5, B5, C5, D5, E5, F5, G5, H5);
row_of_squares!(5; A6, B6, C6, D6, E6, F6, G6, H6);
row_of_squares!(6; A7, B7, C7, D7, E7, F7, G7, H7);
row_of_squares!(7; A8, B8, C8, D8, E8, F8, G8, H8);

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// The row delta of a single pawn push for this player.
    pub const fn forward(self) -> i32 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    /// The row this player's pawns start on, from which they may advance two squares.
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Player::White => 1,
            Player::Black => 6,
        }
    }
}

impl FromStr for Player {
    type Err = PlayerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" | "w" => Ok(Player::White),
            "black" | "b" => Ok(Player::Black),
            _ => Err(PlayerParseError(s.to_owned())),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "white"),
            Player::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    const fn as_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A chess piece. A piece knows who owns it and how it moves, but never where it is; that is the board's business.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub player: Player,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(player: Player, kind: PieceKind) -> Piece {
        Piece { player, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    /// Parses a FEN piece letter. Uppercase letters are White's pieces, lowercase are Black's.
    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(PieceParseError::InvalidChar(value)),
        };

        let player = if value.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };

        Ok(Piece { player, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.player {
            Player::White => self.kind.as_char().to_ascii_uppercase(),
            Player::Black => self.kind.as_char(),
        };

        write!(f, "{}", c)
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// The (row, column) step taken when moving one square in this direction. North is towards Black's side.
    pub const fn as_vector(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }
}

pub const DIAGONALS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

pub const ORTHOGONALS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Iterator over every square on the board, a1 through h8.
pub struct AllSquares(u8, u8);

impl Iterator for AllSquares {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 >= self.1 {
            None
        } else {
            let next = self.0;
            self.0 += 1;
            Some(Square(next))
        }
    }
}

impl DoubleEndedIterator for AllSquares {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.1 <= self.0 {
            None
        } else {
            self.1 -= 1;
            Some(Square(self.1))
        }
    }
}

impl Default for AllSquares {
    fn default() -> Self {
        AllSquares(0, 64)
    }
}

pub fn squares() -> AllSquares {
    AllSquares::default()
}

pub fn players() -> ::std::vec::IntoIter<Player> {
    vec![Player::White, Player::Black].into_iter()
}
