// Error handling for a single transfer worker
use crate::core_command::framer::FrameError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Peer closed the connection")]
    PeerDisconnected,

    #[error("No acknowledgement within {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("Failed to connect to {host}:{port}")]
    DataConnect { host: String, port: u16 },

    #[error("Couldn't open the directory {path:?}: {source}")]
    Directory { path: PathBuf, source: io::Error },

    #[error("File open {path:?}: {source}")]
    FileOpen { path: PathBuf, source: io::Error },

    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),
}

impl TransferError {
    /// Status the worker finishes with when this error ends it.
    pub fn exit_status(&self) -> i32 {
        match self {
            TransferError::PeerDisconnected => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
