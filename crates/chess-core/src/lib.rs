//! chess-core
//!
//! Pure chess rules logic:
//! - positions, colors, pieces and moves
//! - the 8x8 board
//! - per-piece candidate move generation
//! - the game state machine (turns, legality, check / mate / stalemate)

pub mod color;
pub mod piece;
pub mod position;
pub mod chess_move;
pub mod board;
pub mod movegen;
pub mod game;
pub mod error;

pub use color::Color;
pub use piece::{Piece, PieceType, PROMOTION_TYPES};
pub use position::Position;
pub use chess_move::Move;
pub use board::Board;
pub use game::{Game, GameStatus};
pub use error::{MoveError, ParsePieceTypeError, ParsePositionError};
