//! chess-protocol
//!
//! Wire-level encoding/decoding for the chess session server.
//!
//! This crate turns logical commands and server messages into JSON text
//! and back again, and converts between wire shapes and `chess_core`
//! types.
//!
//! - [`wire_types`] : serde shapes of every message on the wire
//! - [`json_codec`] : line framing, encode/decode, core conversions

pub mod wire_types;
pub mod json_codec;

pub use wire_types::{
    CommandType,
    GameId,
    ServerMessage,
    UserGameCommand,
    WireColor,
    WireGame,
    WireMove,
    WirePiece,
    WirePieceType,
    WirePosition,
    WireSquare,
};

pub use json_codec::{
    ProtocolError,
    command_move,
    decode_command,
    decode_server_message,
    encode_command,
    encode_server_message,
    FRAME_DELIMITER,
};
