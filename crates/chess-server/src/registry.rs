//! Registry of live connections per match.
//!
//! One instance is created by the server and shared (behind an `Arc`) by
//! every connection task and match worker. Membership lives in a
//! sharded concurrent map, so add/remove from one connection never waits
//! on a broadcast in progress for another match.
//!
//! Broadcast takes a snapshot of the matching members first and only
//! then sends, so no map lock is held across outbound delivery. Members
//! whose connection turns out to be gone are pruned afterwards.

use chess_protocol::{GameId, ServerMessage};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::types::{ConnectionHandle, ConnectionId};

#[derive(Debug)]
struct Member {
    game_id: GameId,
    handle: ConnectionHandle,
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    members: DashMap<ConnectionId, Member>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry::default()
    }

    /// Bind `handle` to `game_id`, replacing any previous binding.
    pub fn add(&self, handle: ConnectionHandle, game_id: GameId) {
        debug!(connection = handle.id.0, game_id, "registering connection");
        self.members.insert(handle.id, Member { game_id, handle });
    }

    pub fn remove(&self, id: ConnectionId) {
        if self.members.remove(&id).is_some() {
            debug!(connection = id.0, "removed connection");
        }
    }

    /// Match the connection is currently bound to, if any.
    pub fn game_of(&self, id: ConnectionId) -> Option<GameId> {
        self.members.get(&id).map(|m| m.game_id)
    }

    /// Number of connections bound to `game_id`.
    pub fn count(&self, game_id: GameId) -> usize {
        self.members.iter().filter(|m| m.game_id == game_id).count()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Deliver `msg` to every connection of `game_id` except `exclude`.
    ///
    /// Best effort: a failed send is logged, the dead connection is
    /// dropped from the registry, and delivery continues. Returns the
    /// number of connections the message was queued for.
    pub fn broadcast(
        &self,
        exclude: Option<ConnectionId>,
        game_id: GameId,
        msg: &ServerMessage,
    ) -> usize {
        let recipients: Vec<ConnectionHandle> = self
            .members
            .iter()
            .filter(|m| m.game_id == game_id && Some(m.handle.id) != exclude)
            .map(|m| m.handle.clone())
            .collect();

        let mut delivered = 0;
        let mut dead = Vec::new();

        for handle in recipients {
            if handle.is_closed() {
                dead.push(handle.id);
                continue;
            }
            match handle.send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(connection = handle.id.0, game_id, "send failed, dropping connection");
                    dead.push(handle.id);
                }
            }
        }

        for id in dead {
            self.remove(id);
        }

        delivered
    }
}
