//! Session-level error taxonomy.
//!
//! Every variant ends up as an `ERROR` message sent back to the single
//! connection whose command failed; none of them touch other
//! connections or the match state.

use chess_core::{Color, MoveError};
use chess_protocol::{GameId, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected by the rules engine.
    #[error(transparent)]
    InvalidMove(#[from] MoveError),

    /// Missing or invalid identity, or a role that may not do this.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A player tried to move while it is the other side's turn.
    #[error("unauthorized: it is not your turn")]
    TurnMismatch,

    #[error("game {0} does not exist")]
    NotFound(GameId),

    #[error("the {0} slot is already taken")]
    AlreadyOccupied(Color),

    #[error("the game is already over")]
    GameComplete,

    /// Transport-level send/receive failure.
    #[error("communication failure: {0}")]
    Communication(String),

    /// The command could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<ProtocolError> for SessionError {
    fn from(e: ProtocolError) -> Self {
        SessionError::BadRequest(e.to_string())
    }
}

impl SessionError {
    /// Text for the `ERROR` message sent back to the caller.
    pub fn client_message(&self) -> String {
        format!("Error: {}", self)
    }
}
