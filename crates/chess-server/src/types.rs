//! Shared types for the chess TCP server.
//!
//! This module defines:
//! - `ConnectionId` / `ConnectionHandle`: the opaque handle for a live connection
//! - channel aliases between connections and the match workers
//! - `CommandRequest`: commands flowing from connections to the dispatcher

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess_protocol::{ServerMessage, UserGameCommand};
use tokio::sync::mpsc;

/// Identifier for a connected client.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// Outbound messages to a given connection.
pub type OutboundTx = mpsc::UnboundedSender<ServerMessage>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerMessage>;

/// Handle to one live connection: its id plus the queue its writer drains.
///
/// Cloning the handle does not keep the transport alive. Clones share
/// one closed flag, set by the connection task when the peer goes away.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    outbound: OutboundTx,
    closed: Arc<AtomicBool>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, outbound: OutboundTx) -> Self {
        ConnectionHandle {
            id,
            outbound,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a handle together with the receiving end of its queue.
    pub fn channel(id: ConnectionId) -> (Self, OutboundRx) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(id, tx), rx)
    }

    /// Queue `msg` for delivery; fails once the connection is gone.
    pub fn send(&self, msg: ServerMessage) -> Result<(), ServerMessage> {
        self.outbound.send(msg).map_err(|e| e.0)
    }

    /// Mark the transport as gone for every clone of this handle.
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.outbound.is_closed()
    }
}

/// Message flowing from a connection task into the dispatcher.
#[derive(Debug)]
pub struct CommandRequest {
    pub connection: ConnectionHandle,
    pub command: UserGameCommand,
}

/// Channel from connections → dispatcher (and dispatcher → match worker).
pub type CommandTx = mpsc::UnboundedSender<CommandRequest>;
pub type CommandRx = mpsc::UnboundedReceiver<CommandRequest>;
