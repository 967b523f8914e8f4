use crate::constants::MAX_FILE_CHUNK;
use crate::core_command::framer::frame_chunk;
use crate::core_network::error::{Result, TransferError};
use crate::helpers::read_full;
use crate::session::Session;
use log::{debug, error, info};
use std::ffi::OsStr;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Streams a file over the data channel, one framed chunk at a time.
///
/// Each chunk is followed by a wait for one acknowledgement on the control
/// channel before the next read. A read that returns no bytes ends the loop
/// without a further chunk or acknowledgement wait. A directory reads as
/// empty, so `.`, `..` and subdirectories produce no chunks.
pub async fn stream_file(session: &mut Session, data_stream: &mut TcpStream, file_name: &OsStr) -> Result<u64> {
    let file_path = session.base_path.join(file_name);
    let mut file = open_file(&file_path).await?;
    if is_directory(&file).await {
        info!("{:?} is a directory, nothing to send.", file_path);
        return Ok(0);
    }

    let mut buffer = vec![0u8; MAX_FILE_CHUNK];
    let mut sent: u64 = 0;
    let mut chunks: u64 = 0;
    loop {
        let bytes_read = read_full(&mut file, &mut buffer).await.map_err(|e| {
            error!("Error reading file {:?}: {}", file_path, e);
            TransferError::Io(e)
        })?;
        if bytes_read == 0 {
            break;
        }

        let packet = frame_chunk(&buffer[..bytes_read])?;
        if let Err(e) = data_stream.write_all(&packet).await {
            error!("Error sending chunk {} to {}: {}", chunks, session.control.peer(), e);
            return Err(TransferError::Io(e));
        }

        session.control.recv_ack().await?;
        sent += bytes_read as u64;
        chunks += 1;
    }

    debug!("Sent {} bytes in {} chunks from {:?}", sent, chunks, file_path);
    info!("File transfer completed successfully: {:?}", file_path);
    Ok(sent)
}

async fn open_file(path: &Path) -> Result<File> {
    File::open(path).await.map_err(|source| {
        error!("File open {:?}: {}", path, source);
        TransferError::FileOpen {
            path: path.to_path_buf(),
            source,
        }
    })
}

async fn is_directory(file: &File) -> bool {
    file.metadata().await.map(|meta| meta.is_dir()).unwrap_or(false)
}
