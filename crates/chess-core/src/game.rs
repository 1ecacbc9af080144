//! Per-match rules engine and turn state machine.
//!
//! The only stored state is the board and whose turn it is. Check,
//! checkmate and stalemate are computed on demand:
//!
//! - check:     the king's square is hit by an enemy raw candidate move
//! - checkmate: in check and no legal move
//! - stalemate: not in check and no legal move
//!
//! Legal moves are raw candidates filtered by simulating each one on a
//! copy of the board and discarding those that leave the mover's own
//! king in check.

use std::collections::HashSet;

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::MoveError;
use crate::movegen;
use crate::position::Position;

/// Result of evaluating one side's situation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
}

/// Board plus side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// A new game in the standard starting position, White to move.
    pub fn new() -> Self {
        Game {
            board: Board::starting(),
            turn: Color::White,
        }
    }

    /// A game from an arbitrary position.
    pub fn with_board(board: Board, turn: Color) -> Self {
        Game { board, turn }
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Legal moves for the piece at `pos`, or `None` if the square is empty.
    ///
    /// This does not care whose turn it is.
    pub fn valid_moves(&self, pos: Position) -> Option<HashSet<Move>> {
        let piece = self.board.get_piece(pos)?;

        let legal = movegen::piece_moves(&self.board, pos, piece)
            .into_iter()
            .filter(|mv| {
                let mut scratch = self.board.clone();
                scratch.move_piece(mv.start, mv.end, mv.promotion);
                !Self::in_check_on(&scratch, piece.color)
            })
            .collect();

        Some(legal)
    }

    /// Apply `mv` if it is legal for the side to move, then pass the turn.
    ///
    /// On error neither the board nor the turn changes.
    pub fn make_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        let piece = self
            .board
            .get_piece(mv.start)
            .ok_or(MoveError::NoPiece(mv.start))?;

        if piece.color != self.turn {
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                found: piece.color,
            });
        }

        let legal = self.valid_moves(mv.start).unwrap_or_default();
        if !legal.contains(mv) {
            return Err(MoveError::Illegal(*mv));
        }

        self.board.move_piece(mv.start, mv.end, mv.promotion);
        self.turn = self.turn.opposite();
        Ok(())
    }

    /// True if any enemy raw candidate move targets `color`'s king.
    ///
    /// A board without that king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        Self::in_check_on(&self.board, color)
    }

    /// True if at least one of `color`'s pieces has a legal move.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color == color)
            .any(|(pos, _)| self.valid_moves(pos).map_or(false, |moves| !moves.is_empty()))
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    /// Classify `color`'s situation in a single pass over the predicates.
    pub fn status(&self, color: Color) -> GameStatus {
        let in_check = self.is_in_check(color);
        let can_move = self.has_any_legal_move(color);
        match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::InProgress,
        }
    }

    fn in_check_on(board: &Board, color: Color) -> bool {
        match board.king_position(color) {
            Some(king) => movegen::is_attacked_by(board, king, color.opposite()),
            None => false,
        }
    }
}
