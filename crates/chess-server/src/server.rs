//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnectionId`.
//! - Spawns:
//!   - a per-connection task to handle I/O,
//!   - a single dispatcher task that fans commands out to per-match workers.
//!
//! The registry and the collaborators are created by the caller and
//! live as long as the server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::match_task::run_dispatcher;
use crate::registry::ConnectionRegistry;
use crate::store::{AuthService, MatchStore};
use crate::types::{CommandRx, CommandTx, ConnectionHandle, ConnectionId};

/// Bind the configured address and serve until the listener fails.
pub async fn run(
    config: Config,
    auth: Arc<dyn AuthService>,
    store: Arc<dyn MatchStore>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    serve(listener, config.max_clients, auth, store).await
}

/// Accept loop on an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    max_clients: usize,
    auth: Arc<dyn AuthService>,
    store: Arc<dyn MatchStore>,
) -> anyhow::Result<()> {
    let registry = Arc::new(ConnectionRegistry::new());
    let coordinator = Arc::new(Coordinator::new(registry.clone(), auth, store));

    // Channel from connections → dispatcher.
    let (command_tx, command_rx): (CommandTx, CommandRx) = mpsc::unbounded_channel();
    tokio::spawn(run_dispatcher(command_rx, coordinator));

    let live = Arc::new(AtomicUsize::new(0));
    let mut next_id: u64 = 1;

    loop {
        let (stream, peer_addr) = listener.accept().await?;

        if live.load(Ordering::Relaxed) >= max_clients {
            warn!(peer = %peer_addr, max_clients, "rejecting connection: max_clients reached");
            // Just drop the stream; client will see connection closed.
            continue;
        }

        let id = ConnectionId(next_id);
        next_id += 1;
        info!(connection = id.0, peer = %peer_addr, "accepted connection");

        let (handle, out_rx) = ConnectionHandle::channel(id);
        let registry = registry.clone();
        let command_tx = command_tx.clone();
        let live = live.clone();
        live.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            if let Err(e) = client::run_client(handle, stream, command_tx, out_rx, &registry).await {
                warn!(connection = id.0, error = %e, "connection error");
            } else {
                info!(connection = id.0, "disconnected");
            }
            live.fetch_sub(1, Ordering::Relaxed);
        });
    }
}
