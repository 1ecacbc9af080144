//! JSON encoding/decoding of wire messages.
//!
//! Framing model: one JSON document per line. Encoders return the
//! document *without* the trailing [`FRAME_DELIMITER`]; the transport
//! appends it. Decoders accept a line with or without surrounding
//! whitespace.
//!
//! This module also holds the fallible wire → core conversions, since
//! anything arriving from the network may carry out-of-range squares.

use std::convert::TryFrom;
use std::fmt;

use chess_core::{Board, Game, Move, Position};

use crate::wire_types::{ServerMessage, UserGameCommand, WireGame, WireMove, WirePosition};

/// Byte terminating every frame on the wire.
pub const FRAME_DELIMITER: u8 = b'\n';

/// Errors that can arise when encoding/decoding a frame.
#[derive(Debug)]
pub enum ProtocolError {
    /// Malformed JSON or a document of the wrong shape.
    Json(serde_json::Error),
    /// A `MAKE_MOVE` command without a `move`.
    MissingMove,
    /// A field that parsed but holds an impossible value.
    InvalidField(&'static str),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Json(e) => write!(f, "malformed message: {}", e),
            ProtocolError::MissingMove => write!(f, "move command without a move"),
            ProtocolError::InvalidField(field) => write!(f, "invalid field: {}", field),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Json(e)
    }
}

// -----------------------------------------------------------------------------
// Commands (client → server)
// -----------------------------------------------------------------------------

pub fn decode_command(line: &str) -> Result<UserGameCommand, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}

pub fn encode_command(cmd: &UserGameCommand) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(cmd)?)
}

/// The move carried by a `MAKE_MOVE` command, with squares range-checked.
pub fn command_move(cmd: &UserGameCommand) -> Result<Move, ProtocolError> {
    let wire = cmd.chess_move.ok_or(ProtocolError::MissingMove)?;
    Move::try_from(wire)
}

// -----------------------------------------------------------------------------
// Server messages (server → client)
// -----------------------------------------------------------------------------

pub fn encode_server_message(msg: &ServerMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

pub fn decode_server_message(line: &str) -> Result<ServerMessage, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}

// -----------------------------------------------------------------------------
// Wire → core
// -----------------------------------------------------------------------------

impl TryFrom<WirePosition> for Position {
    type Error = ProtocolError;

    fn try_from(p: WirePosition) -> Result<Self, Self::Error> {
        Position::try_new(p.rank, p.file).ok_or(ProtocolError::InvalidField("position"))
    }
}

impl TryFrom<WireMove> for Move {
    type Error = ProtocolError;

    fn try_from(m: WireMove) -> Result<Self, Self::Error> {
        Ok(Move {
            start: Position::try_from(m.start)?,
            end: Position::try_from(m.end)?,
            promotion: m.promotion.map(Into::into),
        })
    }
}

impl TryFrom<&WireGame> for Game {
    type Error = ProtocolError;

    /// Rebuild a game; a square listed twice is rejected.
    fn try_from(g: &WireGame) -> Result<Self, Self::Error> {
        let mut board = Board::new();
        for square in &g.board {
            let pos = Position::try_from(square.position)?;
            if board.get_piece(pos).is_some() {
                return Err(ProtocolError::InvalidField("board"));
            }
            board.add_piece(pos, square.piece.into());
        }
        Ok(Game::with_board(board, g.turn.into()))
    }
}
