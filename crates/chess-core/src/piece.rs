//! Piece kinds and colored pieces.
//!
//! A [`Piece`] is a plain value: it carries no history, and promotion
//! replaces the piece on the board rather than mutating it.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::ParsePieceTypeError;

/// The six piece kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

/// Kinds a pawn may promote to, in generation order.
pub const PROMOTION_TYPES: [PieceType; 4] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
];

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
        PieceType::Pawn,
    ];

    /// Index for table lookups: King=0 .. Pawn=5.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper-case letter used in text boards and move strings.
    pub fn as_char(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Rook => 'R',
            PieceType::Pawn => 'P',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceType::King => "king",
            PieceType::Queen => "queen",
            PieceType::Bishop => "bishop",
            PieceType::Knight => "knight",
            PieceType::Rook => "rook",
            PieceType::Pawn => "pawn",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PieceType {
    type Err = ParsePieceTypeError;

    /// Accepts a single letter (`q`, `N`, ...) or a full name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "k" | "king" => PieceType::King,
            "q" | "queen" => PieceType::Queen,
            "b" | "bishop" => PieceType::Bishop,
            "n" | "knight" => PieceType::Knight,
            "r" | "rook" => PieceType::Rook,
            "p" | "pawn" => PieceType::Pawn,
            _ => return Err(ParsePieceTypeError(s.to_string())),
        };
        Ok(kind)
    }
}

/// A colored piece.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// Letter for text boards: upper-case for White, lower-case for Black.
    pub fn as_char(self) -> char {
        let c = self.kind.as_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}
