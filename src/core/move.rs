// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::*;
use serde::{Serialize, Serializer};
use std::fmt;

const SOURCE_MASK: u16 = 0xFC00;
const DESTINATION_MASK: u16 = 0x03F0;
const CAPTURE_BIT: u16 = 0x0004;

/// A move from one square to another. It is designed to be as compact as possible.
/// ## Encoding
///
///  * 6 bits - source square
///  * 6 bits - destination square
///  * 2 bits - unused
///  * 1 bit  - capture bit
///  * 1 bit  - unused
///
/// There are no special moves (castling, en-passant, promotion) so most of the low nibble is spare.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Constructs a new quiet move from the source square to the destination square.
    pub const fn quiet(source: Square, dest: Square) -> Move {
        Move((source.0 as u16) << 10 | (dest.0 as u16) << 4)
    }

    /// Constructs a new capture move from the source square to the destination square.
    pub const fn capture(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | CAPTURE_BIT)
    }

    pub const fn new(source: Square, dest: Square, is_capture: bool) -> Move {
        if is_capture {
            Move::capture(source, dest)
        } else {
            Move::quiet(source, dest)
        }
    }

    pub const fn source(self) -> Square {
        Square(((self.0 & SOURCE_MASK) >> 10) as u8)
    }

    pub const fn destination(self) -> Square {
        Square(((self.0 & DESTINATION_MASK) >> 4) as u8)
    }

    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE_BIT != 0
    }

    pub const fn is_quiet(self) -> bool {
        !self.is_capture()
    }

    pub fn as_uci(self) -> String {
        format!("{}{}", self.source(), self.destination())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_capture() {
            write!(f, "{}x{}", self.source(), self.destination())
        } else {
            write!(f, "{}{}", self.source(), self.destination())
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.destination())
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
