//! Session coordinator.
//!
//! Turns one inbound command into rules-engine calls, store updates and
//! registry broadcasts. The coordinator itself is stateless apart from
//! its collaborators; read-modify-write on a match is only safe because
//! every command for a given match is handled by that match's worker
//! (see `match_task`), one at a time.
//!
//! Routing policy:
//! - `CONNECT`:   `LOAD_GAME` to the caller; join notice to everyone else.
//! - `MAKE_MOVE`: `LOAD_GAME` to everyone; move notice to everyone else;
//!                check / checkmate / stalemate notice to everyone.
//! - `RESIGN`:    resignation notice to everyone, caller included.
//! - `LEAVE`:     departure notice to everyone else.
//! - any failure: `ERROR` to the caller only.

use std::sync::Arc;

use chess_core::{Color, GameStatus, Move};
use chess_protocol::json_codec::command_move;
use chess_protocol::{CommandType, GameId, ServerMessage, UserGameCommand};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::registry::ConnectionRegistry;
use crate::store::{AuthService, Identity, MatchRecord, MatchStore};
use crate::types::ConnectionHandle;

pub struct Coordinator {
    registry: Arc<ConnectionRegistry>,
    auth: Arc<dyn AuthService>,
    store: Arc<dyn MatchStore>,
}

impl Coordinator {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        auth: Arc<dyn AuthService>,
        store: Arc<dyn MatchStore>,
    ) -> Self {
        Coordinator {
            registry,
            auth,
            store,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Whether the store knows `game_id`.
    pub fn match_exists(&self, game_id: GameId) -> bool {
        self.store.get(game_id).is_some()
    }

    /// Handle one command; failures are reported to the caller as `ERROR`.
    pub fn process(&self, caller: &ConnectionHandle, command: UserGameCommand) {
        let game_id = command.game_id;
        let kind = command.command_type;

        if let Err(err) = self.handle(caller, command) {
            debug!(connection = caller.id.0, game_id, ?kind, error = %err, "command rejected");
            if caller.send(ServerMessage::error(err.client_message())).is_err() {
                warn!(connection = caller.id.0, "could not deliver error, connection gone");
            }
        }
    }

    /// Handle one command, returning the failure instead of reporting it.
    pub fn handle(
        &self,
        caller: &ConnectionHandle,
        command: UserGameCommand,
    ) -> Result<(), SessionError> {
        let who = self.auth.resolve(&command.auth_token)?;
        let record = self
            .store
            .get(command.game_id)
            .ok_or(SessionError::NotFound(command.game_id))?;

        match command.command_type {
            CommandType::Connect => self.connect(caller, who, record),
            CommandType::MakeMove => {
                let mv = command_move(&command)?;
                self.make_move(caller, who, record, mv)
            }
            CommandType::Leave => self.leave(caller, who, record),
            CommandType::Resign => self.resign(caller, who, record),
        }
    }

    fn connect(
        &self,
        caller: &ConnectionHandle,
        who: Identity,
        record: MatchRecord,
    ) -> Result<(), SessionError> {
        let game_id = record.game_id;
        self.registry.add(caller.clone(), game_id);
        // The transport may have closed while this command was queued.
        if caller.is_closed() {
            self.registry.remove(caller.id);
        }

        let color = record.color_of(&who);
        self.reply(caller, ServerMessage::load_game(&record.game, color));

        let text = match color {
            Some(c) => format!("User {} joined game {} as color {}", who, record.name, c),
            None => format!("User {} joined game {} as observer", who, record.name),
        };
        info!(game_id, user = %who, color = ?color, "joined");
        self.registry
            .broadcast(Some(caller.id), game_id, &ServerMessage::notification(text));
        Ok(())
    }

    fn make_move(
        &self,
        caller: &ConnectionHandle,
        who: Identity,
        mut record: MatchRecord,
        mv: Move,
    ) -> Result<(), SessionError> {
        if record.complete {
            return Err(SessionError::GameComplete);
        }

        let color = record.game.turn();
        if record.player(color) != Some(&who) {
            return Err(match record.color_of(&who) {
                Some(_) => SessionError::TurnMismatch,
                None => SessionError::Unauthorized("observers cannot make moves".to_string()),
            });
        }

        record.game.make_move(&mv)?;

        let opponent = color.opposite();
        let status = record.game.status(opponent);
        if matches!(status, GameStatus::Checkmate | GameStatus::Stalemate) {
            record.complete = true;
        }

        let game_id = record.game_id;
        self.store.update(record.clone())?;
        info!(game_id, user = %who, %mv, ?status, "move accepted");

        let load = ServerMessage::load_game(&record.game, None);
        self.broadcast_all(caller, game_id, load);

        self.registry.broadcast(
            Some(caller.id),
            game_id,
            &ServerMessage::notification(describe_move(&who, &mv)),
        );

        if let Some(text) = status_text(opponent, status) {
            self.broadcast_all(caller, game_id, ServerMessage::notification(text));
        }
        Ok(())
    }

    fn resign(
        &self,
        caller: &ConnectionHandle,
        who: Identity,
        mut record: MatchRecord,
    ) -> Result<(), SessionError> {
        if record.complete {
            return Err(SessionError::GameComplete);
        }
        if record.color_of(&who).is_none() {
            return Err(SessionError::Unauthorized(
                "observers cannot resign".to_string(),
            ));
        }

        record.complete = true;
        let game_id = record.game_id;
        let text = format!("User {} resigned from game {}", who, record.name);
        self.store.update(record)?;
        info!(game_id, user = %who, "resigned");

        self.broadcast_all(caller, game_id, ServerMessage::notification(text));
        Ok(())
    }

    fn leave(
        &self,
        caller: &ConnectionHandle,
        who: Identity,
        mut record: MatchRecord,
    ) -> Result<(), SessionError> {
        let game_id = record.game_id;
        let text = format!("User {} left game {}", who, record.name);

        if let Some(color) = record.color_of(&who) {
            *record.slot_mut(color) = None;
            self.store.update(record)?;
        }
        info!(game_id, user = %who, "left");

        self.registry
            .broadcast(Some(caller.id), game_id, &ServerMessage::notification(text));
        // A LEAVE for some other match must not unbind this connection.
        if self.registry.game_of(caller.id) == Some(game_id) {
            self.registry.remove(caller.id);
        }
        Ok(())
    }

    /// Everyone in the match except the caller, then the caller directly.
    ///
    /// The caller may not be registered (it never sent `CONNECT`), so it
    /// is always addressed explicitly.
    fn broadcast_all(&self, caller: &ConnectionHandle, game_id: GameId, msg: ServerMessage) {
        self.registry.broadcast(Some(caller.id), game_id, &msg);
        self.reply(caller, msg);
    }

    /// Best effort: a caller that has gone away is dropped from the registry.
    fn reply(&self, caller: &ConnectionHandle, msg: ServerMessage) {
        if caller.send(msg).is_err() {
            warn!(connection = caller.id.0, "reply failed, dropping connection");
            self.registry.remove(caller.id);
        }
    }
}

fn describe_move(who: &Identity, mv: &Move) -> String {
    match mv.promotion {
        Some(kind) => format!(
            "User {} moved {} to {} promoting to {}",
            who, mv.start, mv.end, kind
        ),
        None => format!("User {} moved {} to {}", who, mv.start, mv.end),
    }
}

fn status_text(color: Color, status: GameStatus) -> Option<String> {
    match status {
        GameStatus::InProgress => None,
        GameStatus::Check => Some(format!("{} is in check", color)),
        GameStatus::Checkmate => Some(format!("{} is in checkmate", color)),
        GameStatus::Stalemate => Some(format!("{} is in stalemate", color)),
    }
}
