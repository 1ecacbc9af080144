// crates/chess-client/src/network.rs

use anyhow::Result;
use chess_protocol::{
    decode_server_message, encode_command, ServerMessage, UserGameCommand, FRAME_DELIMITER,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// One TCP session with the chess server.
///
/// Outgoing commands arrive on a channel from the front end; every line
/// the server sends is decoded and pushed to `tx`. When the connection
/// ends, `tx` is dropped, which the front end sees as a closed channel.
pub struct GameConnection {
    server_addr: String,
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    tx: UnboundedSender<ServerMessage>,
}

impl GameConnection {
    pub async fn connect(server_addr: &str, tx: UnboundedSender<ServerMessage>) -> Result<Self> {
        info!("Connecting to {}...", server_addr);

        let stream = match TcpStream::connect(server_addr).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Connection failed: {}", e);
                return Err(e.into());
            }
        };
        stream.set_nodelay(true)?;
        info!("Connected successfully");

        let (read_half, writer) = stream.into_split();
        Ok(Self {
            server_addr: server_addr.to_string(),
            lines: BufReader::new(read_half).lines(),
            writer,
            tx,
        })
    }

    pub async fn send(&mut self, cmd: &UserGameCommand) -> Result<()> {
        let mut frame = encode_command(cmd)?;
        frame.push(FRAME_DELIMITER as char);

        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.flush().await?;

        debug!("Sent command: {:?}", cmd.command_type);
        Ok(())
    }

    /// Pump commands out and server messages in until either side closes.
    pub async fn run(mut self, mut rx: UnboundedReceiver<UserGameCommand>) {
        loop {
            tokio::select! {
                cmd = rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("front end closed, shutting down connection");
                        break;
                    };
                    if let Err(e) = self.send(&cmd).await {
                        error!("Failed to send command: {}", e);
                        break;
                    }
                }

                line = self.lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if line.trim().is_empty() {
                                continue;
                            }
                            match decode_server_message(&line) {
                                Ok(msg) => {
                                    debug!("Received from server: {:?}", msg);
                                    if self.tx.send(msg).is_err() {
                                        break;
                                    }
                                }
                                Err(e) => warn!("Ignoring undecodable line: {}", e),
                            }
                        }
                        Ok(None) => {
                            warn!("{} closed the connection", self.server_addr);
                            break;
                        }
                        Err(e) => {
                            error!("Read error: {}", e);
                            break;
                        }
                    }
                }
            }
        }
    }
}
