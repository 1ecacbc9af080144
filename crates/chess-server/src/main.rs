//! Chess session server.

use std::sync::Arc;

use chess_server::config::Config;
use chess_server::server;
use chess_server::store::{MemoryAuth, MemoryMatchStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!(
        bind = %config.bind_addr,
        port = config.port,
        max_clients = config.max_clients,
        "starting chess-server"
    );

    let auth = Arc::new(MemoryAuth::new());
    let store = Arc::new(MemoryMatchStore::new());

    if let Some(seed) = config.load_seed()? {
        seed.apply(&auth, store.as_ref())?;
        info!(
            users = seed.users.len(),
            games = seed.games.len(),
            "loaded seed file"
        );
    }

    server::run(config, auth, store).await
}
