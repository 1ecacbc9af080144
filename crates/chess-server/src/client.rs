// crates/chess-server/src/client.rs

use chess_protocol::json_codec::{decode_command, encode_server_message};
use chess_protocol::{ServerMessage, FRAME_DELIMITER};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::registry::ConnectionRegistry;
use crate::types::{CommandRequest, CommandTx, ConnectionHandle, OutboundRx};

/// Run the I/O loops for a single connection.
///
/// The writer task drains `out_rx` onto the socket; the reader loop
/// decodes one command per line and forwards it to the dispatcher.
/// Returns once the peer closes or the transport fails, after removing
/// the connection from the registry.
pub async fn run_client(
    handle: ConnectionHandle,
    stream: TcpStream,
    command_tx: CommandTx,
    out_rx: OutboundRx,
    registry: &ConnectionRegistry,
) -> Result<(), SessionError> {
    let (read_stream, write_stream) = stream.into_split();
    let id = handle.id;

    // The writer exits once every clone of the handle is dropped, so
    // replies to commands still queued for this connection get flushed.
    tokio::spawn(run_writer(id.0, write_stream, out_rx));

    let result = run_reader(&handle, read_stream, command_tx).await;

    // Unbind from the match; any slot the user holds stays theirs.
    handle.mark_closed();
    registry.remove(id);

    result
}

async fn run_reader(
    handle: &ConnectionHandle,
    read_stream: OwnedReadHalf,
    command_tx: CommandTx,
) -> Result<(), SessionError> {
    let mut lines = BufReader::new(read_stream).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!(connection = handle.id.0, "peer closed connection");
                return Ok(());
            }
            Err(e) => return Err(SessionError::Communication(e.to_string())),
        };

        if line.trim().is_empty() {
            continue;
        }
        debug!(connection = handle.id.0, %line, "received");

        match decode_command(&line) {
            Ok(command) => {
                let req = CommandRequest {
                    connection: handle.clone(),
                    command,
                };
                if command_tx.send(req).is_err() {
                    return Err(SessionError::Communication(
                        "dispatcher channel closed".to_string(),
                    ));
                }
            }
            Err(e) => {
                let err = SessionError::from(e);
                warn!(connection = handle.id.0, error = %err, "undecodable command");
                if handle.send(ServerMessage::error(err.client_message())).is_err() {
                    return Ok(());
                }
            }
        }
    }
}

async fn run_writer(connection: u64, mut write_stream: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(msg) = out_rx.recv().await {
        if let Err(e) = write_message(&mut write_stream, &msg).await {
            warn!(connection, error = %e, "write failed");
            break;
        }
    }
}

async fn write_message(
    stream: &mut OwnedWriteHalf,
    msg: &ServerMessage,
) -> Result<(), SessionError> {
    let mut frame = encode_server_message(msg)?;
    frame.push(FRAME_DELIMITER as char);

    stream
        .write_all(frame.as_bytes())
        .await
        .map_err(|e| SessionError::Communication(e.to_string()))?;
    stream
        .flush()
        .await
        .map_err(|e| SessionError::Communication(e.to_string()))?;

    debug!(%frame, "sent");
    Ok(())
}
