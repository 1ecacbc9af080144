//! Error types for the rules engine.
//!
//! Every [`MoveError`] is an "invalid move" from the caller's point of
//! view; the variants only record which check rejected it.

use thiserror::Error;

use crate::chess_move::Move;
use crate::color::Color;
use crate::position::Position;

/// Why [`Game::make_move`](crate::Game::make_move) rejected a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// There is no piece on the start square.
    #[error("invalid move: no piece at {0}")]
    NoPiece(Position),

    /// The piece on the start square belongs to the side not on move.
    #[error("invalid move: it is {expected}'s turn, but the piece is {found}")]
    WrongTurn { expected: Color, found: Color },

    /// The move is not among the legal moves of that piece.
    #[error("invalid move: {0} is not legal")]
    Illegal(Move),
}

/// Text that is not a square in algebraic notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square: {0:?}")]
pub struct ParsePositionError(pub String);

/// Text that does not name a piece type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid piece type: {0:?}")]
pub struct ParsePieceTypeError(pub String);
