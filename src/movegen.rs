// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Destination generation for individual pieces. Moves produced here respect piece geometry, the board's edges,
//! blocking and the basic capture rule (never onto your own piece) but nothing more: there is no notion of check,
//! castling, en-passant or promotion.

use thiserror::Error;

use crate::board::{Board, BoardError, BoardMut, PieceId};
use crate::core::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("piece {0} is not on the board")]
    PieceNotOnBoard(PieceId),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// True if a piece belonging to `us` may finish its move on `target`: the square is empty or holds an enemy.
fn can_land_on<B: Board + ?Sized>(us: Player, target: Square, board: &B) -> bool {
    match board.piece_at(target) {
        Some(occupant) => occupant.player != us,
        None => true,
    }
}

fn is_enemy<B: Board + ?Sized>(us: Player, target: Square, board: &B) -> bool {
    matches!(board.piece_at(target), Some(occupant) if occupant.player != us)
}

pub fn pawn_moves<B: Board + ?Sized>(us: Player, from: Square, board: &B) -> SquareSet {
    let mut moves = SquareSet::empty();
    let up = us.forward();

    // Pushes never capture, and a double push from the start row needs both squares empty.
    if let Some(single) = from.offset(up, 0) {
        if board.piece_at(single).is_none() {
            moves.insert(single);
            if from.row() == us.pawn_start_row() {
                if let Some(double) = single.offset(up, 0) {
                    if board.piece_at(double).is_none() {
                        moves.insert(double);
                    }
                }
            }
        }
    }

    // Diagonals are capture-only.
    for target in pawn_attacks(from, us) {
        if is_enemy(us, target, board) {
            moves.insert(target);
        }
    }

    moves
}

pub fn knight_moves<B: Board + ?Sized>(us: Player, from: Square, board: &B) -> SquareSet {
    knight_attacks(from)
        .into_iter()
        .filter(|&target| can_land_on(us, target, board))
        .collect()
}

pub fn king_moves<B: Board + ?Sized>(us: Player, from: Square, board: &B) -> SquareSet {
    king_attacks(from)
        .into_iter()
        .filter(|&target| can_land_on(us, target, board))
        .collect()
}

/// Walks each direction until the edge of the board or the first occupied square, which is included only if it
/// holds an enemy piece.
fn slide<B: Board + ?Sized>(
    us: Player,
    from: Square,
    directions: &[Direction],
    board: &B,
) -> SquareSet {
    let mut moves = SquareSet::empty();
    for &dir in directions {
        for target in ray(from, dir) {
            match board.piece_at(target) {
                None => moves.insert(target),
                Some(occupant) => {
                    if occupant.player != us {
                        moves.insert(target);
                    }
                    break;
                }
            }
        }
    }

    moves
}

pub fn bishop_moves<B: Board + ?Sized>(us: Player, from: Square, board: &B) -> SquareSet {
    slide(us, from, &DIAGONALS, board)
}

pub fn rook_moves<B: Board + ?Sized>(us: Player, from: Square, board: &B) -> SquareSet {
    slide(us, from, &ORTHOGONALS, board)
}

pub fn queen_moves<B: Board + ?Sized>(us: Player, from: Square, board: &B) -> SquareSet {
    bishop_moves(us, from, board) | rook_moves(us, from, board)
}

/// Destinations for `piece` standing on `from`. The board is only consulted for occupancy; whether `piece` really
/// stands on `from` is not checked.
pub fn moves_from<B: Board + ?Sized>(piece: Piece, from: Square, board: &B) -> SquareSet {
    let us = piece.player;
    match piece.kind {
        PieceKind::Pawn => pawn_moves(us, from, board),
        PieceKind::Knight => knight_moves(us, from, board),
        PieceKind::Bishop => bishop_moves(us, from, board),
        PieceKind::Rook => rook_moves(us, from, board),
        PieceKind::Queen => queen_moves(us, from, board),
        PieceKind::King => king_moves(us, from, board),
    }
}

fn locate<B: Board + ?Sized>(id: PieceId, board: &B) -> Result<(Square, Piece), MoveError> {
    let located = board
        .find_piece(id)
        .and_then(|sq| board.piece_at(sq).map(|piece| (sq, piece)));
    match located {
        Some(found) => Ok(found),
        None => {
            tracing::warn!(piece = %id, "board could not locate piece");
            Err(MoveError::PieceNotOnBoard(id))
        }
    }
}

/// Every square the given piece may move to, as found by asking the board where it stands.
pub fn available_moves<B: Board + ?Sized>(id: PieceId, board: &B) -> Result<SquareSet, MoveError> {
    let (from, piece) = locate(id, board)?;
    let moves = moves_from(piece, from, board);
    tracing::trace!(piece = %piece, from = %from, count = moves.len(), "generated moves");
    Ok(moves)
}

/// Generates every move available to `us`, visiting pieces in square order.
pub fn generate_moves<B: Board + ?Sized>(us: Player, board: &B, moves: &mut Vec<Move>) {
    for from in board.pieces(us) {
        let piece = match board.piece_at(from) {
            Some(piece) => piece,
            None => continue,
        };

        for target in moves_from(piece, from, board) {
            moves.push(Move::new(from, target, board.piece_at(target).is_some()));
        }
    }
}

/// Moves a piece to `destination`, capturing anything standing there. The destination is not checked against
/// [`available_moves`]; callers that care about legality must check first.
pub fn move_to<B: BoardMut + ?Sized>(
    id: PieceId,
    board: &mut B,
    destination: Square,
) -> Result<(), MoveError> {
    let (from, piece) = locate(id, board)?;
    tracing::debug!(piece = %piece, from = %from, to = %destination, "moving piece");
    board.relocate(from, destination)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Position;

    fn position(placement: &'static str) -> Position {
        Position::from_placement(placement).unwrap()
    }

    fn set(squares: &[Square]) -> SquareSet {
        squares.iter().copied().collect()
    }

    fn moves_at(pos: &Position, square: Square) -> SquareSet {
        let id = pos
            .piece_id_at(square)
            .unwrap_or_else(|| panic!("no piece on {}", square));
        available_moves(id, pos).unwrap()
    }

    fn assert_moves(placement: &'static str, square: Square, expected: &[Square]) {
        let pos = position(placement);
        let actual = moves_at(&pos, square);
        let expected = set(expected);
        if actual != expected {
            println!("{}", pos);
            println!("expected:\n{}", expected);
            println!("actual:\n{}", actual);
            panic!("move mismatch for piece on {}", square);
        }
    }

    fn rotate(sq: Square) -> Square {
        Square::at(7 - sq.row() as i32, 7 - sq.col() as i32).unwrap()
    }

    fn lone_piece_moves(piece: Piece, square: Square) -> SquareSet {
        let mut pos = Position::new();
        let id = pos.add_piece(square, piece).unwrap();
        available_moves(id, &pos).unwrap()
    }

    mod pawns {
        use super::*;

        #[test]
        fn start_row_double_push() {
            assert_moves("8/8/8/8/8/8/3P4/8", D2, &[D3, D4]);
        }

        #[test]
        fn blocked_by_enemy_directly_ahead() {
            assert_moves("8/8/8/8/8/3p4/3P4/8", D2, &[]);
        }

        #[test]
        fn double_push_blocked_on_second_square() {
            assert_moves("8/8/8/8/3p4/8/3P4/8", D2, &[D3]);
        }

        #[test]
        fn single_push_off_start_row() {
            assert_moves("8/8/8/8/5P2/8/8/8", F4, &[F5]);
        }

        #[test]
        fn captures_enemy_but_not_own() {
            assert_moves("8/8/2P1p3/3P4/8/8/8/8", D5, &[D6, E6]);
        }

        #[test]
        fn captures_with_push_blocked() {
            assert_moves("8/8/8/8/2pnp3/3P4/8/8", D3, &[C4, E4]);
        }

        #[test]
        fn black_moves_down() {
            assert_moves("8/4p3/8/8/8/8/8/8", E7, &[E6, E5]);
        }

        #[test]
        fn black_captures_down() {
            assert_moves("8/8/8/4p3/3PP3/8/8/8", E5, &[D4]);
        }

        #[test]
        fn no_wrap_around_edges() {
            // an enemy on the h-file must not be reachable from the a-file.
            assert_moves("8/8/8/7p/P7/8/8/8", A4, &[A5]);
            assert_moves("8/8/8/p7/7P/8/8/8", H4, &[H5]);
        }

        #[test]
        fn far_rank_has_no_moves() {
            assert_moves("3P4/8/8/8/8/8/8/8", D8, &[]);
            assert_moves("8/8/8/8/8/8/8/3p4", D1, &[]);
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn center() {
            assert_moves(
                "8/8/8/8/3N4/8/8/8",
                D4,
                &[B3, B5, C2, C6, E2, E6, F3, F5],
            );
        }

        #[test]
        fn corner_with_own_piece() {
            assert_moves("8/8/8/8/8/8/2P5/N7", A1, &[B3]);
        }

        #[test]
        fn captures_enemy() {
            assert_moves("8/8/8/8/8/1p6/2p5/N7", A1, &[B3, C2]);
        }

        #[test]
        fn jumps_over_pieces() {
            let pos = Position::from_start_position();
            assert_eq!(set(&[A3, C3]), moves_at(&pos, B1));
            assert_eq!(set(&[F6, H6]), moves_at(&pos, G8));
        }
    }

    mod bishops {
        use super::*;

        #[test]
        fn smoke_test() {
            assert_moves(
                "8/8/8/8/3B4/8/8/8",
                D4,
                &[E5, F6, G7, H8, E3, F2, G1, C3, B2, A1, C5, B6, A7],
            );
        }

        #[test]
        fn smoke_capture() {
            assert_moves("8/8/8/2p1p3/3B4/2p1p3/8/8", D4, &[E5, E3, C5, C3]);
        }

        #[test]
        fn own_pieces_block() {
            assert_moves("8/8/8/2P1P3/3B4/2P1P3/8/8", D4, &[]);
        }
    }

    mod rooks {
        use super::*;

        #[test]
        fn capture_stops_and_own_piece_blocks() {
            assert_moves(
                "8/8/8/P7/8/8/8/R3p3",
                A1,
                &[B1, C1, D1, E1, A2, A3, A4],
            );
        }

        #[test]
        fn empty_board_has_fourteen() {
            let moves = lone_piece_moves(Piece::new(Player::Black, PieceKind::Rook), E4);
            assert_eq!(14, moves.len());
        }

        #[test]
        fn boxed_in_at_start() {
            let pos = Position::from_start_position();
            assert!(moves_at(&pos, A1).is_empty());
            assert!(moves_at(&pos, H8).is_empty());
        }
    }

    mod queens {
        use super::*;

        #[test]
        fn empty_board_has_twenty_seven() {
            let moves = lone_piece_moves(Piece::new(Player::White, PieceKind::Queen), D4);
            assert_eq!(27, moves.len());
        }

        #[test]
        fn combines_rook_and_bishop() {
            let pos = position("8/8/1p3p2/8/3Q4/8/1P1P4/8");
            let queen = moves_at(&pos, D4);
            let us = Player::White;
            assert_eq!(
                bishop_moves(us, D4, &pos) | rook_moves(us, D4, &pos),
                queen
            );
            assert!(queen.contains(B6));
            assert!(queen.contains(F6));
            assert!(!queen.contains(A7));
            assert!(!queen.contains(B2));
            assert!(!queen.contains(D2));
            assert!(queen.contains(D3));
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn corner() {
            assert_moves("7K/8/8/8/8/8/8/8", H8, &[G7, H7, G8]);
            assert_moves("8/8/8/8/8/8/8/k7", A1, &[A2, B1, B2]);
        }

        #[test]
        fn bottom_edge_stays_on_board() {
            assert_moves("8/8/8/8/8/8/8/4K3", E1, &[D1, F1, D2, E2, F2]);
        }

        #[test]
        fn left_edge_has_no_duplicates() {
            let pos = position("8/8/8/8/K7/8/8/8");
            let moves = moves_at(&pos, A4);
            assert_eq!(5, moves.len());
            assert_eq!(set(&[A3, A5, B3, B4, B5]), moves);
        }

        #[test]
        fn captures_enemy_not_own() {
            assert_moves("8/8/8/3pP3/3K4/8/8/8", D4, &[C3, C4, C5, D3, D5, E3, E4]);
        }
    }

    mod symmetry {
        use super::*;

        fn edge_distances(sq: Square) -> (u8, u8) {
            let row = sq.row().min(7 - sq.row());
            let col = sq.col().min(7 - sq.col());
            (row.min(col), row.max(col))
        }

        #[test]
        fn lone_knight_and_king_counts_depend_only_on_edge_distance() {
            for kind in [PieceKind::Knight, PieceKind::King] {
                let mut counts: HashMap<(u8, u8), u32> = HashMap::new();
                for sq in squares() {
                    let count = lone_piece_moves(Piece::new(Player::White, kind), sq).len();
                    let expected = *counts.entry(edge_distances(sq)).or_insert(count);
                    assert_eq!(expected, count, "{:?} on {}", kind, sq);
                }
            }
        }

        #[test]
        fn rotation_with_player_swap() {
            let kinds = [
                PieceKind::Pawn,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen,
                PieceKind::King,
            ];
            for kind in kinds {
                for sq in squares() {
                    let white = lone_piece_moves(Piece::new(Player::White, kind), sq);
                    let black = lone_piece_moves(Piece::new(Player::Black, kind), rotate(sq));
                    let rotated: SquareSet = white.into_iter().map(rotate).collect();
                    assert_eq!(rotated, black, "{:?} on {}", kind, sq);
                }
            }
        }

        #[test]
        fn knight_d4_mirrors_black_knight_e5() {
            let white = lone_piece_moves(Piece::new(Player::White, PieceKind::Knight), D4);
            let black = lone_piece_moves(Piece::new(Player::Black, PieceKind::Knight), E5);
            assert_eq!(8, white.len());
            assert_eq!(white.into_iter().map(rotate).collect::<SquareSet>(), black);
        }
    }

    mod properties {
        use rand::{rngs::SmallRng, Rng, SeedableRng};
        use std::convert::TryFrom;

        use super::*;
        use crate::board::PieceId;

        const KINDS: [PieceKind; 6] = [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ];

        fn random_position(rng: &mut SmallRng) -> (Position, Vec<PieceId>) {
            let mut pos = Position::new();
            let mut ids = Vec::new();
            let count = rng.gen_range(1..=32);
            while ids.len() < count {
                let square = Square::try_from(rng.gen_range(0..64u8)).unwrap();
                let player = if rng.gen_bool(0.5) {
                    Player::White
                } else {
                    Player::Black
                };
                let kind = KINDS[rng.gen_range(0..KINDS.len())];
                if let Ok(id) = pos.add_piece(square, Piece::new(player, kind)) {
                    ids.push(id);
                }
            }

            (pos, ids)
        }

        #[test]
        fn never_lands_on_own_piece() {
            let mut rng = SmallRng::seed_from_u64(0x5eed_c4e55);
            for _ in 0..500 {
                let (pos, ids) = random_position(&mut rng);
                for id in ids {
                    let from = pos.find_piece(id).unwrap();
                    let mover = pos.piece_at(from).unwrap();
                    for target in available_moves(id, &pos).unwrap() {
                        assert_ne!(from, target);
                        if let Some(occupant) = pos.piece_at(target) {
                            assert_ne!(
                                mover.player, occupant.player,
                                "{} on {} may land on its own piece at {}\n{}",
                                mover, from, target, pos
                            );
                        }
                    }
                }
            }
        }

        #[test]
        fn repeated_queries_agree() {
            let mut rng = SmallRng::seed_from_u64(42);
            for _ in 0..100 {
                let (pos, ids) = random_position(&mut rng);
                for id in ids {
                    assert_eq!(
                        available_moves(id, &pos).unwrap(),
                        available_moves(id, &pos).unwrap()
                    );
                }
            }
        }

        #[test]
        fn generate_moves_matches_per_piece_queries() {
            let mut rng = SmallRng::seed_from_u64(7);
            for _ in 0..100 {
                let (pos, ids) = random_position(&mut rng);
                for us in players() {
                    let mut moves = Vec::new();
                    generate_moves(us, &pos, &mut moves);
                    let expected: u32 = ids
                        .iter()
                        .filter(|&&id| pos.piece(id).unwrap().player == us)
                        .map(|&id| available_moves(id, &pos).unwrap().len())
                        .sum();
                    assert_eq!(expected as usize, moves.len());
                    for mov in moves {
                        assert_eq!(mov.is_capture(), pos.piece_at(mov.destination()).is_some());
                    }
                }
            }
        }
    }

    mod whole_side {
        use super::*;

        #[test]
        fn start_position_has_twenty_quiet_moves() {
            let pos = Position::from_start_position();
            for us in players() {
                let mut moves = Vec::new();
                generate_moves(us, &pos, &mut moves);
                assert_eq!(20, moves.len());
                assert!(moves.iter().all(|m| m.is_quiet()));
            }
        }

        #[test]
        fn captures_are_flagged() {
            let pos = position("8/8/8/3p4/4P3/8/8/8");
            let mut moves = Vec::new();
            generate_moves(Player::White, &pos, &mut moves);
            assert!(moves.contains(&Move::capture(E4, D5)));
            assert!(moves.contains(&Move::quiet(E4, E5)));
            assert_eq!(2, moves.len());
        }
    }

    mod execution {
        use super::*;

        #[test]
        fn move_to_relocates() {
            let mut pos = Position::from_start_position();
            let pawn = pos.piece_id_at(E2).unwrap();
            move_to(pawn, &mut pos, E4).unwrap();
            assert_eq!(Some(E4), pos.find_piece(pawn));
            assert!(pos.piece_at(E2).is_none());
            assert_eq!(set(&[E5]), available_moves(pawn, &pos).unwrap());
        }

        #[test]
        fn move_to_captures_by_overwriting() {
            let mut pos = position("8/8/8/3p4/4P3/8/8/8");
            let pawn = pos.piece_id_at(E4).unwrap();
            let victim = pos.piece_id_at(D5).unwrap();
            move_to(pawn, &mut pos, D5).unwrap();
            assert_eq!(Some(D5), pos.find_piece(pawn));
            assert_eq!(
                Err(MoveError::PieceNotOnBoard(victim)),
                available_moves(victim, &pos)
            );
            assert_eq!(
                Err(MoveError::PieceNotOnBoard(victim)),
                move_to(victim, &mut pos, D4)
            );
        }

        #[test]
        fn move_to_does_not_check_legality() {
            let mut pos = position("8/8/8/8/8/8/8/R7");
            let rook = pos.piece_id_at(A1).unwrap();
            move_to(rook, &mut pos, H8).unwrap();
            assert_eq!(Some(H8), pos.find_piece(rook));
        }

        #[test]
        fn unknown_piece_is_not_on_board() {
            let big = Position::from_start_position();
            let stranger = big.piece_id_at(H8).unwrap();
            let mut small = position("8/8/8/8/8/8/8/K7");
            assert_eq!(
                Err(MoveError::PieceNotOnBoard(stranger)),
                available_moves(stranger, &small)
            );
            assert_eq!(
                Err(MoveError::PieceNotOnBoard(stranger)),
                move_to(stranger, &mut small, A2)
            );
        }

        #[test]
        fn handle_from_another_board_is_not_on_board() {
            let start = Position::from_start_position();
            let rook = start.piece_id_at(H8).unwrap();
            // the other board has a piece behind every arena slot the rook's handle could name.
            let mut crowded = position("8/8/8/8/8/8/8/KNNNNNNN");
            assert_eq!(
                Err(MoveError::PieceNotOnBoard(rook)),
                available_moves(rook, &crowded)
            );
            assert_eq!(
                Err(MoveError::PieceNotOnBoard(rook)),
                move_to(rook, &mut crowded, G6)
            );
            assert_eq!(Some(H8), start.find_piece(rook));
        }

        #[test]
        fn handle_survives_cloning() {
            let pos = position("8/8/8/8/3Q4/8/8/8");
            let queen = pos.piece_id_at(D4).unwrap();
            let copy = pos.clone();
            assert_eq!(available_moves(queen, &pos), available_moves(queen, &copy));
        }
    }

    mod shared_board {
        use std::sync::{Arc, RwLock};
        use std::thread;

        use super::*;

        #[test]
        fn concurrent_readers_then_single_writer() {
            let pos = Position::from_start_position();
            let ids: Vec<_> = squares().filter_map(|sq| pos.piece_id_at(sq)).collect();
            let expected: Vec<_> = ids
                .iter()
                .map(|&id| available_moves(id, &pos).unwrap())
                .collect();
            let shared = Arc::new(RwLock::new(pos));

            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let shared = Arc::clone(&shared);
                    let ids = ids.clone();
                    thread::spawn(move || {
                        let guard = shared.read().unwrap();
                        ids.iter()
                            .map(|&id| available_moves(id, &*guard).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for reader in readers {
                assert_eq!(expected, reader.join().unwrap());
            }

            let knight = ids[1];
            {
                let mut guard = shared.write().unwrap();
                move_to(knight, &mut *guard, C3).unwrap();
            }
            let guard = shared.read().unwrap();
            assert_eq!(Some(C3), guard.find_piece(knight));
        }
    }
}
