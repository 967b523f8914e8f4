use crate::config::ServerConfig;
use crate::core_network::control::ControlChannel;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpStream;

/// State owned by one worker for the lifetime of its single request.
#[derive(Debug)]
pub struct Session {
    pub control: ControlChannel,
    pub peer_host: String,     // Where the data channel is opened
    pub control_port: u16,     // Listener port, for log lines
    pub base_path: PathBuf,    // Served working directory
}

impl Session {
    pub fn new(stream: TcpStream, peer: SocketAddr, control_port: u16, config: &ServerConfig) -> Self {
        Self {
            control: ControlChannel::new(stream, peer, config.ack_timeout()),
            peer_host: peer.ip().to_string(),
            control_port,
            base_path: config.root_dir.clone(),
        }
    }
}
