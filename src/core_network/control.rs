use crate::constants::MAX_CONTROL_MSG;
use crate::core_network::error::{Result, TransferError};
use log::{debug, error};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// The accepted client connection carrying commands, the readiness
/// handshake and per-chunk acknowledgements.
///
/// Messages are raw text of at most 512 bytes with no framing: one read is
/// one message.
#[derive(Debug)]
pub struct ControlChannel {
    stream: TcpStream,
    peer: SocketAddr,
    timeout: Option<Duration>,
}

impl ControlChannel {
    pub fn new(stream: TcpStream, peer: SocketAddr, timeout: Option<Duration>) -> Self {
        Self {
            stream,
            peer,
            timeout,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Receives one message with no time limit. A zero-byte read means the
    /// client went away.
    pub async fn recv_message(&mut self) -> Result<Vec<u8>> {
        self.recv_within(None).await
    }

    /// Receives a reply the server is blocked on (handshake or
    /// acknowledgement), bounded by the configured timeout.
    pub async fn recv_reply(&mut self) -> Result<Vec<u8>> {
        self.recv_within(self.timeout).await
    }

    /// Waits for one acknowledgement; its content is not inspected.
    pub async fn recv_ack(&mut self) -> Result<()> {
        self.recv_reply().await.map(|_| ())
    }

    async fn recv_within(&mut self, limit: Option<Duration>) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; MAX_CONTROL_MSG];
        let read = match limit {
            Some(limit) => tokio::time::timeout(limit, self.stream.read(&mut buffer))
                .await
                .map_err(|_| TransferError::Timeout(limit.as_secs()))?,
            None => self.stream.read(&mut buffer).await,
        };

        let n = read.map_err(|e| {
            error!("Receive from {}: {}", self.peer, e);
            TransferError::Io(e)
        })?;
        if n == 0 {
            debug!("Control connection closed by {}", self.peer);
            return Err(TransferError::PeerDisconnected);
        }

        buffer.truncate(n);
        Ok(buffer)
    }

    pub async fn send_message(&mut self, message: &[u8]) -> Result<()> {
        if let Err(e) = self.stream.write_all(message).await {
            error!("Send to {}: {}", self.peer, e);
            return Err(TransferError::Io(e));
        }
        Ok(())
    }

    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!("Control shutdown for {}: {}", self.peer, e);
        }
    }
}
