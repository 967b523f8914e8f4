use crate::core_command::lister::{listed_entries, name_bytes};
use crate::core_network::error::{Result, TransferError};
use crate::session::Session;
use log::{error, info};
use std::ffi::OsString;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Sends every listed entry of `snapshot` as one raw message, waiting for an
/// acknowledgement on the control channel after each. Names go out as the
/// raw bytes the OS reported.
pub async fn stream_listing(session: &mut Session, data_stream: &mut TcpStream, snapshot: &[OsString]) -> Result<usize> {
    let entries = listed_entries(snapshot);
    for name in entries {
        if let Err(e) = data_stream.write_all(&name_bytes(name)).await {
            error!("Failed to send directory entry {:?}: {}", name, e);
            return Err(TransferError::Io(e));
        }
        session.control.recv_ack().await?;
    }

    info!("Directory listing sent successfully ({} entries).", entries.len());
    Ok(entries.len())
}
