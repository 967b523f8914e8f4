use crate::config::ServerConfig;
use crate::core_command::dispatcher::{dispatch, Outcome};
use crate::core_network::error::{Result, TransferError};
use crate::session::Session;
use log::{debug, error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// What a finished worker reports back to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Completed,
    Failed,
}

impl WorkerStatus {
    pub fn code(&self) -> i32 {
        match self {
            WorkerStatus::Completed => 0,
            WorkerStatus::Failed => 1,
        }
    }
}

/// Owns one client's control connection from accept to close: reads a single
/// command, dispatches it, then closes. A client hanging up at any point is a
/// normal finish.
pub async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    control_port: u16,
    config: Arc<ServerConfig>,
) -> WorkerStatus {
    info!("Connection from {}", peer.ip());
    let mut session = Session::new(socket, peer, control_port, &config);

    let status = match serve_request(&mut session).await {
        Ok(outcome) => {
            debug!("Request from {} finished: {:?}", peer, outcome);
            WorkerStatus::Completed
        }
        Err(TransferError::PeerDisconnected) => {
            debug!("Client {} disconnected", peer);
            WorkerStatus::Completed
        }
        Err(e) => {
            error!("Worker for {} failed: {}", peer, e);
            WorkerStatus::Failed
        }
    };

    session.control.close().await;
    status
}

/// The first command is awaited without a time limit; only replies the
/// worker is blocked on are bounded.
async fn serve_request(session: &mut Session) -> Result<Outcome> {
    let message = session.control.recv_message().await?;
    dispatch(session, &message).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn accept_pair() -> (TcpStream, SocketAddr, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
        let (socket, peer) = listener.accept().await.unwrap();
        (socket, peer, client)
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WorkerStatus::Completed.code(), 0);
        assert_eq!(WorkerStatus::Failed.code(), 1);
    }

    #[tokio::test]
    async fn test_immediate_disconnect_completes() {
        let (socket, peer, client) = accept_pair().await;
        drop(client);
        let status = handle_connection(socket, peer, 0, Arc::new(ServerConfig::default())).await;
        assert_eq!(status, WorkerStatus::Completed);
    }

    #[tokio::test]
    async fn test_unreachable_data_port_fails() {
        let root = tempfile::tempdir().unwrap();
        let config = Arc::new(ServerConfig {
            root_dir: root.path().to_path_buf(),
            ..ServerConfig::default()
        });
        let closed_port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let (socket, peer, mut client) = accept_pair().await;
        let worker = tokio::spawn(handle_connection(socket, peer, 0, config));

        client
            .write_all(format!("l {}\n", closed_port).as_bytes())
            .await
            .unwrap();
        let mut ready = [0u8; 6];
        client.read_exact(&mut ready).await.unwrap();
        client.write_all(b"ready\n").await.unwrap();

        assert_eq!(worker.await.unwrap(), WorkerStatus::Failed);
    }

    #[tokio::test]
    async fn test_unreadable_list_port_fails() {
        let root = tempfile::tempdir().unwrap();
        let config = Arc::new(ServerConfig {
            root_dir: root.path().to_path_buf(),
            ..ServerConfig::default()
        });

        let (socket, peer, mut client) = accept_pair().await;
        let worker = tokio::spawn(handle_connection(socket, peer, 0, config));

        client.write_all(b"l abc\n").await.unwrap();
        let mut ready = [0u8; 6];
        client.read_exact(&mut ready).await.unwrap();
        assert_eq!(&ready, b"ready\0");
        client.write_all(b"ready\n").await.unwrap();

        assert_eq!(worker.await.unwrap(), WorkerStatus::Failed);
    }

    #[tokio::test]
    async fn test_slow_first_command_is_served() {
        let root = tempfile::tempdir().unwrap();
        let config = Arc::new(ServerConfig {
            root_dir: root.path().to_path_buf(),
            ack_timeout_secs: Some(1),
            ..ServerConfig::default()
        });

        let (socket, peer, mut client) = accept_pair().await;
        let worker = tokio::spawn(handle_connection(socket, peer, 0, config));

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        client.write_all(b"g 30000 missing.txt").await.unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, b"FILE NOT FOUND\0".to_vec());

        assert_eq!(worker.await.unwrap(), WorkerStatus::Completed);
    }
}
