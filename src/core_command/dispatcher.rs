use crate::constants::{FILE_NOT_FOUND_MSG, READY_MSG, READY_TOKEN};
use crate::core_command::command::Command;
use crate::core_command::{list, lister, retr};
use crate::core_network::error::Result;
use crate::core_network::port::setup_port_connection;
use crate::helpers::tokenize;
use crate::session::Session;
use log::{debug, info};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// How a request ended when it ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file or listing was streamed in full.
    Served,
    /// `FILE NOT FOUND` went back on the control channel.
    NotFound,
    /// The command matched neither verb; nothing was sent.
    Ignored,
    /// The client answered the handshake with something other than `ready`.
    Declined,
}

/// Runs one request to completion.
///
/// Get: check file, handshake, connect data, stream chunks.
/// List: handshake, connect data, stream entries.
pub async fn dispatch(session: &mut Session, message: &[u8]) -> Result<Outcome> {
    let command = match Command::parse(message) {
        Some(command) => command,
        None => {
            debug!(
                "Ignoring unrecognized command from {}: {:?}",
                session.control.peer(),
                String::from_utf8_lossy(message)
            );
            return Ok(Outcome::Ignored);
        }
    };

    let snapshot = lister::snapshot(&session.base_path).await?;
    let data_port = command.data_port();

    match &command {
        Command::Get { file, .. } => {
            info!(
                "File \"{}\" requested on port {}.",
                file.to_string_lossy(),
                session.control_port
            );
            if !lister::contains(&snapshot, file) {
                info!(
                    "File not found. Sending error message to {}:{}",
                    session.peer_host, data_port
                );
                session.control.send_message(FILE_NOT_FOUND_MSG).await?;
                return Ok(Outcome::NotFound);
            }
        }
        Command::List { .. } => {
            info!("List directory requested on port {}.", data_port);
        }
    }

    if !handshake(session).await? {
        return Ok(Outcome::Declined);
    }

    let mut data_stream = setup_port_connection(&session.peer_host, data_port).await?;

    match &command {
        Command::Get { file, .. } => {
            info!(
                "Sending \"{}\" to {}:{}",
                file.to_string_lossy(),
                session.peer_host,
                data_port
            );
            retr::stream_file(session, &mut data_stream, file).await?;
        }
        Command::List { .. } => {
            info!(
                "Sending directory contents to {}:{}",
                session.peer_host, data_port
            );
            list::stream_listing(session, &mut data_stream, &snapshot).await?;
        }
    }

    close_data_channel(data_stream).await;
    Ok(Outcome::Served)
}

/// Sends `ready` and waits for the client's reply. Only a first token of
/// exactly `ready` lets the request continue.
async fn handshake(session: &mut Session) -> Result<bool> {
    session.control.send_message(READY_MSG).await?;
    let reply = session.control.recv_reply().await?;

    let tokens = tokenize(&reply);
    let accepted = tokens.first().copied() == Some(READY_TOKEN);
    if !accepted {
        debug!(
            "Client {} did not confirm readiness: {:?}",
            session.control.peer(),
            String::from_utf8_lossy(tokens.first().copied().unwrap_or_default())
        );
    }
    Ok(accepted)
}

async fn close_data_channel(mut data_stream: TcpStream) {
    if let Err(e) = data_stream.shutdown().await {
        debug!("Failed to shutdown data stream: {:?}", e);
    }
}
