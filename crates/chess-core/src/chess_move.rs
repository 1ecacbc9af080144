//! A single move: start square, end square, optional promotion.

use std::fmt;

use crate::piece::PieceType;
use crate::position::Position;

/// A move from `start` to `end`.
///
/// `promotion` is only set for pawn moves that reach the far rank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(start: Position, end: Position) -> Self {
        Move {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Position, end: Position, promotion: PieceType) -> Self {
        Move {
            start,
            end,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for Move {
    /// Long algebraic form, e.g. `e2e4` or `a7a8q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.as_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
