//! Wire shapes of every message.
//!
//! Client → server, one per line:
//!
//! ```text
//! {"commandType":"MAKE_MOVE","authToken":"t","gameID":1,
//!  "move":{"start":{"rank":2,"file":5},"end":{"rank":4,"file":5}}}
//! ```
//!
//! Server → client, tagged by `serverMessageType`:
//!
//! ```text
//! {"serverMessageType":"LOAD_GAME","game":{...},"playerColor":"WHITE"}
//! {"serverMessageType":"NOTIFICATION","message":"..."}
//! {"serverMessageType":"ERROR","message":"Error: ..."}
//! ```
//!
//! Enumerations use upper-case names (`WHITE`, `QUEEN`, ...).

use chess_core::{Color, Game, Move, Piece, PieceType, Position};
use serde::{Deserialize, Serialize};

/// Identifier of a match, as carried in `gameID`.
pub type GameId = u32;

/// Command kinds (client → server).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// A command from one connection.
///
/// `move` is only present for `MAKE_MOVE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameCommand {
    pub command_type: CommandType,
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub chess_move: Option<WireMove>,
}

impl UserGameCommand {
    pub fn new(command_type: CommandType, auth_token: impl Into<String>, game_id: GameId) -> Self {
        UserGameCommand {
            command_type,
            auth_token: auth_token.into(),
            game_id,
            chess_move: None,
        }
    }

    pub fn make_move(auth_token: impl Into<String>, game_id: GameId, mv: Move) -> Self {
        UserGameCommand {
            chess_move: Some(WireMove::from(mv)),
            ..UserGameCommand::new(CommandType::MakeMove, auth_token, game_id)
        }
    }
}

/// Messages pushed from the server to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Full match state.
    LoadGame {
        game: WireGame,
        #[serde(rename = "playerColor", default, skip_serializing_if = "Option::is_none")]
        player_color: Option<WireColor>,
    },

    /// Human-readable event in the match.
    Notification { message: String },

    /// A command from this connection failed.
    Error { message: String },
}

impl ServerMessage {
    pub fn load_game(game: &Game, player_color: Option<Color>) -> Self {
        ServerMessage::LoadGame {
            game: WireGame::from(game),
            player_color: player_color.map(WireColor::from),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// Value shapes
// -----------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireColor {
    White,
    Black,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WirePieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

/// `{"rank": 1-8, "file": 1-8}`; range is checked when converting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub rank: u8,
    pub file: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePiece {
    pub color: WireColor,
    #[serde(rename = "type")]
    pub kind: WirePieceType,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub start: WirePosition,
    pub end: WirePosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<WirePieceType>,
}

/// One occupied square.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSquare {
    pub position: WirePosition,
    pub piece: WirePiece,
}

/// Game state: side to move plus occupied squares only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGame {
    pub turn: WireColor,
    pub board: Vec<WireSquare>,
}

// -----------------------------------------------------------------------------
// Conversions from core (infallible). The fallible direction lives in
// `json_codec` because wire positions may be out of range.
// -----------------------------------------------------------------------------

impl From<Color> for WireColor {
    fn from(c: Color) -> Self {
        match c {
            Color::White => WireColor::White,
            Color::Black => WireColor::Black,
        }
    }
}

impl From<WireColor> for Color {
    fn from(c: WireColor) -> Self {
        match c {
            WireColor::White => Color::White,
            WireColor::Black => Color::Black,
        }
    }
}

impl From<PieceType> for WirePieceType {
    fn from(k: PieceType) -> Self {
        match k {
            PieceType::King => WirePieceType::King,
            PieceType::Queen => WirePieceType::Queen,
            PieceType::Bishop => WirePieceType::Bishop,
            PieceType::Knight => WirePieceType::Knight,
            PieceType::Rook => WirePieceType::Rook,
            PieceType::Pawn => WirePieceType::Pawn,
        }
    }
}

impl From<WirePieceType> for PieceType {
    fn from(k: WirePieceType) -> Self {
        match k {
            WirePieceType::King => PieceType::King,
            WirePieceType::Queen => PieceType::Queen,
            WirePieceType::Bishop => PieceType::Bishop,
            WirePieceType::Knight => PieceType::Knight,
            WirePieceType::Rook => PieceType::Rook,
            WirePieceType::Pawn => PieceType::Pawn,
        }
    }
}

impl From<Position> for WirePosition {
    fn from(p: Position) -> Self {
        WirePosition {
            rank: p.rank(),
            file: p.file(),
        }
    }
}

impl From<Piece> for WirePiece {
    fn from(p: Piece) -> Self {
        WirePiece {
            color: p.color.into(),
            kind: p.kind.into(),
        }
    }
}

impl From<WirePiece> for Piece {
    fn from(p: WirePiece) -> Self {
        Piece::new(p.color.into(), p.kind.into())
    }
}

impl From<Move> for WireMove {
    fn from(m: Move) -> Self {
        WireMove {
            start: m.start.into(),
            end: m.end.into(),
            promotion: m.promotion.map(WirePieceType::from),
        }
    }
}

impl From<&Game> for WireGame {
    fn from(game: &Game) -> Self {
        WireGame {
            turn: game.turn().into(),
            board: game
                .board()
                .pieces()
                .map(|(pos, piece)| WireSquare {
                    position: pos.into(),
                    piece: piece.into(),
                })
                .collect(),
        }
    }
}
