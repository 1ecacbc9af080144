// crates/chess-client/src/main.rs

mod app;
mod network;

use anyhow::Result;
use chess_protocol::{GameId, ServerMessage, UserGameCommand};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::network::GameConnection;

#[derive(Parser)]
#[clap(name = "chess-client")]
#[clap(about = "Terminal client for live chess matches")]
struct Cli {
    /// Server address
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Auth token issued to your user
    #[clap(short, long)]
    token: String,

    /// Match to play or watch
    #[clap(short, long)]
    game_id: GameId,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging stays off unless asked for, so it does not mix with the prompt.
    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let app = App::new(&cli.token, cli.game_id);
    run_app(app, &cli.server).await
}

async fn run_app(mut app: App, server_addr: &str) -> Result<()> {
    // Create channels for network communication
    let (tx_to_network, rx_from_app) = mpsc::unbounded_channel::<UserGameCommand>();
    let (tx_to_app, mut rx_from_network) = mpsc::unbounded_channel::<ServerMessage>();

    app.set_network_sender(tx_to_network);

    let connection = GameConnection::connect(server_addr, tx_to_app).await?;
    let network_handle = tokio::spawn(connection.run(rx_from_app));

    println!("connected to {}, type help for commands", server_addr);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                for out in app.handle_input(&line) {
                    println!("{}", out);
                }
            }

            msg = rx_from_network.recv() => {
                let Some(msg) = msg else {
                    println!("connection closed by server");
                    break;
                };
                for out in app.handle_server_message(msg) {
                    println!("{}", out);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("shutting down");
    network_handle.abort();
    Ok(())
}
