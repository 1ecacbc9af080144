//! Board coordinates.
//!
//! Ranks and files are both 1-based (`1..=8`). At any text boundary a
//! square is written in algebraic notation: file letter `a-h` followed by
//! rank digit `1-8`, so `"e2"` is `(rank 2, file 5)`.

use std::fmt;
use std::str::FromStr;

use crate::error::ParsePositionError;

/// Number of ranks / files on the board.
pub const BOARD_SIZE: u8 = 8;

/// An immutable `(rank, file)` pair on the 8x8 grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    rank: u8,
    file: u8,
}

impl Position {
    /// Construct a position.
    ///
    /// # Panics
    ///
    /// Panics if `rank` or `file` is outside `1..=8`. Callers holding
    /// untrusted input should use [`Position::try_new`].
    pub fn new(rank: u8, file: u8) -> Self {
        assert!(
            Self::in_range(rank as i16, file as i16),
            "position out of range: rank {}, file {}",
            rank,
            file
        );
        Position { rank, file }
    }

    /// Construct a position, returning `None` when out of range.
    pub fn try_new(rank: u8, file: u8) -> Option<Self> {
        if Self::in_range(rank as i16, file as i16) {
            Some(Position { rank, file })
        } else {
            None
        }
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn file(self) -> u8 {
        self.file
    }

    /// Step by `(d_rank, d_file)`; `None` if that leaves the board.
    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Self> {
        let rank = self.rank as i16 + d_rank as i16;
        let file = self.file as i16 + d_file as i16;
        if Self::in_range(rank, file) {
            Some(Position {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, rank-major starting at a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|rank| (1..=BOARD_SIZE).map(move |file| Position { rank, file }))
    }

    fn in_range(rank: i16, file: i16) -> bool {
        (1..=BOARD_SIZE as i16).contains(&rank) && (1..=BOARD_SIZE as i16).contains(&file)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file - 1) as char;
        write!(f, "{}{}", file, self.rank)
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(ParsePositionError(s.to_string()));
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ParsePositionError(s.to_string()));
        }

        Ok(Position {
            rank: rank - b'0',
            file: file - b'a' + 1,
        })
    }
}
