//! The 8x8 board.
//!
//! The board is a fixed grid of optional pieces. It is cheap to copy,
//! which is how the game simulates candidate moves: clone, apply, and
//! inspect the copy.

use std::fmt;

use crate::color::Color;
use crate::piece::{Piece, PieceType};
use crate::position::{Position, BOARD_SIZE};

const N: usize = BOARD_SIZE as usize;

/// Officer order on the back rank, file a through h.
const BACK_RANK: [PieceType; N] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// A grid of 64 optional pieces, at most one per square.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// `cells[rank - 1][file - 1]`.
    cells: [[Option<Piece>; N]; N],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board::default()
    }

    /// A board with the standard 32-piece starting layout.
    pub fn starting() -> Self {
        let mut board = Board::new();
        board.reset();
        board
    }

    /// Clear the board and place the standard starting layout.
    pub fn reset(&mut self) {
        self.cells = Default::default();

        for color in Color::ALL {
            for (i, kind) in BACK_RANK.iter().enumerate() {
                let file = i as u8 + 1;
                self.add_piece(Position::new(color.home_rank(), file), Piece::new(color, *kind));
                self.add_piece(
                    Position::new(color.pawn_start_rank(), file),
                    Piece::new(color, PieceType::Pawn),
                );
            }
        }
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.cells[Self::rank_idx(pos)][Self::file_idx(pos)]
    }

    /// Place `piece` at `pos`, overwriting any occupant.
    pub fn add_piece(&mut self, pos: Position, piece: Piece) {
        self.cells[Self::rank_idx(pos)][Self::file_idx(pos)] = Some(piece);
    }

    /// Clear `pos`, returning whatever was there.
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        self.cells[Self::rank_idx(pos)][Self::file_idx(pos)].take()
    }

    /// Move the piece at `start` to `end`.
    ///
    /// Anything on `end` is captured. With `promotion` set, the piece that
    /// lands is a fresh piece of the same color and the promotion kind.
    /// Does nothing if `start` is empty.
    pub fn move_piece(&mut self, start: Position, end: Position, promotion: Option<PieceType>) {
        let Some(piece) = self.remove_piece(start) else {
            return;
        };

        let landed = match promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        self.add_piece(end, landed);
    }

    /// Iterate over occupied squares, rank-major starting at a1.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get_piece(pos).map(|piece| (pos, piece)))
    }

    /// Square of `color`'s king, if it is on the board.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.color == color && piece.kind == PieceType::King)
            .map(|(pos, _)| pos)
    }

    fn rank_idx(pos: Position) -> usize {
        pos.rank() as usize - 1
    }

    fn file_idx(pos: Position) -> usize {
        pos.file() as usize - 1
    }
}

impl fmt::Display for Board {
    /// Rank 8 first; upper-case White, lower-case Black, `.` for empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_SIZE).rev() {
            write!(f, "{} ", rank)?;
            for file in 1..=BOARD_SIZE {
                let c = self
                    .get_piece(Position::new(rank, file))
                    .map_or('.', Piece::as_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
