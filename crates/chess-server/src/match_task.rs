//! Command dispatch and per-match workers.
//!
//! Every connection task pushes its decoded commands into one dispatcher
//! channel. The dispatcher owns a table of match workers keyed by
//! `gameID` and forwards each command to the worker for its match,
//! spawning the worker on first use.
//!
//! A worker handles its commands strictly one at a time, so for a given
//! match:
//! - read-modify-write of the match record never interleaves, and
//! - all broadcasts for one command are queued before the next command
//!   starts.
//!
//! Matches do not wait on each other.
//!
//! Workers only exist for matches the store knows about; commands for
//! any other `gameID` are answered by the dispatcher directly. A worker
//! that has been idle for a while reports back, and the dispatcher
//! retires it once every command it was sent has been handled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chess_protocol::GameId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::coordinator::Coordinator;
use crate::types::{CommandRequest, CommandRx, CommandTx};

/// How long a match worker waits for a command before reporting idle.
pub const WORKER_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Sent by a worker that has seen no command for the idle timeout.
#[derive(Debug)]
struct WorkerIdle {
    game_id: GameId,
    handled: u64,
}

struct Worker {
    tx: CommandTx,
    sent: u64,
}

/// Run the dispatcher until every sender of `command_rx` is dropped.
pub async fn run_dispatcher(command_rx: CommandRx, coordinator: Arc<Coordinator>) {
    run_dispatcher_with_idle_timeout(command_rx, coordinator, WORKER_IDLE_TIMEOUT).await
}

pub async fn run_dispatcher_with_idle_timeout(
    mut command_rx: CommandRx,
    coordinator: Arc<Coordinator>,
    idle_timeout: Duration,
) {
    let mut workers: HashMap<GameId, Worker> = HashMap::new();
    let (idle_tx, mut idle_rx) = mpsc::unbounded_channel::<WorkerIdle>();

    loop {
        tokio::select! {
            req = command_rx.recv() => {
                let Some(req) = req else { break };
                let game_id = req.command.game_id;

                if !workers.contains_key(&game_id) && !coordinator.match_exists(game_id) {
                    // Unknown match: answer here (NotFound or an auth error).
                    coordinator.process(&req.connection, req.command);
                    continue;
                }

                let worker = workers.entry(game_id).or_insert_with(|| {
                    spawn_worker(game_id, coordinator.clone(), idle_tx.clone(), idle_timeout)
                });

                match worker.tx.send(req) {
                    Ok(()) => worker.sent += 1,
                    Err(mpsc::error::SendError(req)) => {
                        // The worker died (it only stops on panic); replace it and retry once.
                        warn!(game_id, "match worker gone, respawning");
                        let mut fresh =
                            spawn_worker(game_id, coordinator.clone(), idle_tx.clone(), idle_timeout);
                        match fresh.tx.send(req) {
                            Ok(()) => fresh.sent += 1,
                            Err(_) => warn!(game_id, "dropping command, match worker unavailable"),
                        }
                        *worker = fresh;
                    }
                }
            }

            Some(idle) = idle_rx.recv() => {
                // Retire only if nothing is queued or in flight; dropping the
                // sender lets the worker's `recv` return `None`.
                let drained = workers
                    .get(&idle.game_id)
                    .map_or(false, |w| w.sent == idle.handled);
                if drained {
                    workers.remove(&idle.game_id);
                    debug!(game_id = idle.game_id, "retired idle match worker");
                }
            }
        }
    }

    info!("dispatcher shutting down (command channel closed)");
}

fn spawn_worker(
    game_id: GameId,
    coordinator: Arc<Coordinator>,
    idle_tx: mpsc::UnboundedSender<WorkerIdle>,
    idle_timeout: Duration,
) -> Worker {
    let (tx, rx) = mpsc::unbounded_channel();
    debug!(game_id, "spawning match worker");
    tokio::spawn(run_match_worker(game_id, rx, coordinator, idle_tx, idle_timeout));
    Worker { tx, sent: 0 }
}

async fn run_match_worker(
    game_id: GameId,
    mut rx: CommandRx,
    coordinator: Arc<Coordinator>,
    idle_tx: mpsc::UnboundedSender<WorkerIdle>,
    idle_timeout: Duration,
) {
    let mut handled: u64 = 0;

    loop {
        match tokio::time::timeout(idle_timeout, rx.recv()).await {
            Ok(Some(CommandRequest {
                connection,
                command,
            })) => {
                coordinator.process(&connection, command);
                handled += 1;
            }
            Ok(None) => break,
            Err(_) => {
                if idle_tx.send(WorkerIdle { game_id, handled }).is_err() {
                    break;
                }
            }
        }
    }

    debug!(game_id, "match worker stopped");
}
