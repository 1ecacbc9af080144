//! Candidate move generation.
//!
//! Generation is a pure function of piece kind, color, square and board.
//! It respects blocking and capture on the current board but ignores king
//! safety entirely; [`Game`](crate::Game) filters self-check afterwards.
//!
//! Dispatch is a table of generator functions indexed by
//! [`PieceType::index`].

use std::collections::HashSet;

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::{Piece, PieceType, PROMOTION_TYPES};
use crate::position::Position;

type Generator = fn(&Board, Position, Color, &mut HashSet<Move>);

/// Generators indexed by `PieceType::index()`; keep in the enum's order.
const GENERATORS: [Generator; 6] = [
    king_moves,
    queen_moves,
    bishop_moves,
    knight_moves,
    rook_moves,
    pawn_moves,
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Raw candidate moves for `piece` standing on `from`.
pub fn piece_moves(board: &Board, from: Position, piece: Piece) -> HashSet<Move> {
    let mut moves = HashSet::new();
    GENERATORS[piece.kind.index()](board, from, piece.color, &mut moves);
    moves
}

/// True if any raw candidate of any `attacker` piece ends on `target`.
pub fn is_attacked_by(board: &Board, target: Position, attacker: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == attacker)
        .any(|(pos, piece)| piece_moves(board, pos, piece).iter().any(|m| m.end == target))
}

// -----------------------------------------------------------------------------
// Per-kind generators
// -----------------------------------------------------------------------------

fn king_moves(board: &Board, from: Position, color: Color, moves: &mut HashSet<Move>) {
    step(board, from, color, &DIAGONALS, moves);
    step(board, from, color, &ORTHOGONALS, moves);
}

fn queen_moves(board: &Board, from: Position, color: Color, moves: &mut HashSet<Move>) {
    slide(board, from, color, &DIAGONALS, moves);
    slide(board, from, color, &ORTHOGONALS, moves);
}

fn bishop_moves(board: &Board, from: Position, color: Color, moves: &mut HashSet<Move>) {
    slide(board, from, color, &DIAGONALS, moves);
}

fn rook_moves(board: &Board, from: Position, color: Color, moves: &mut HashSet<Move>) {
    slide(board, from, color, &ORTHOGONALS, moves);
}

fn knight_moves(board: &Board, from: Position, color: Color, moves: &mut HashSet<Move>) {
    step(board, from, color, &KNIGHT_JUMPS, moves);
}

fn pawn_moves(board: &Board, from: Position, color: Color, moves: &mut HashSet<Move>) {
    let forward = color.forward();

    // Straight ahead: only onto empty squares, never a capture.
    if let Some(one) = from.offset(forward, 0) {
        if board.get_piece(one).is_none() {
            push_pawn_move(from, one, color, moves);

            if from.rank() == color.pawn_start_rank() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.get_piece(two).is_none() {
                        push_pawn_move(from, two, color, moves);
                    }
                }
            }
        }
    }

    // Diagonals: capture only.
    for d_file in [-1, 1] {
        if let Some(target) = from.offset(forward, d_file) {
            if matches!(board.get_piece(target), Some(p) if p.color != color) {
                push_pawn_move(from, target, color, moves);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

/// Walk each vector until the edge; stop before an own piece, stop after
/// capturing an enemy piece.
fn slide(
    board: &Board,
    from: Position,
    color: Color,
    vectors: &[(i8, i8)],
    moves: &mut HashSet<Move>,
) {
    for &(d_rank, d_file) in vectors {
        let mut current = from;
        while let Some(next) = current.offset(d_rank, d_file) {
            match board.get_piece(next) {
                None => {
                    moves.insert(Move::new(from, next));
                }
                Some(occupant) => {
                    if occupant.color != color {
                        moves.insert(Move::new(from, next));
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

/// Single step along each offset onto anything but an own piece.
fn step(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut HashSet<Move>,
) {
    for &(d_rank, d_file) in offsets {
        let Some(target) = from.offset(d_rank, d_file) else {
            continue;
        };
        match board.get_piece(target) {
            Some(occupant) if occupant.color == color => {}
            _ => {
                moves.insert(Move::new(from, target));
            }
        }
    }
}

/// Landing on the far rank fans out into one move per promotion kind.
fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut HashSet<Move>) {
    if to.rank() == color.promotion_rank() {
        for kind in PROMOTION_TYPES {
            moves.insert(Move::promoting(from, to, kind));
        }
    } else {
        moves.insert(Move::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_table_follows_enum_order() {
        // A lone piece in the middle of an empty board distinguishes every kind.
        let from = Position::new(4, 4);
        let expected = [8, 27, 13, 8, 14, 1];
        for kind in PieceType::ALL {
            let mut board = Board::new();
            let piece = Piece::new(Color::White, kind);
            board.add_piece(from, piece);
            assert_eq!(
                piece_moves(&board, from, piece).len(),
                expected[kind.index()],
                "{:?}",
                kind
            );
        }
    }
}
