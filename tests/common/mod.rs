#![allow(dead_code)]

use ftserve::config::ServerConfig;
use ftserve::constants::SIGINT;
use ftserve::core_command::framer::read_chunk;
use ftserve::core_network::network::{Listener, ShutdownReport};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<i32>,
    handle: JoinHandle<ShutdownReport>,
}

impl TestServer {
    pub async fn start(root: &Path) -> Self {
        Self::start_with(ServerConfig {
            root_dir: root.to_path_buf(),
            ..ServerConfig::default()
        })
        .await
    }

    pub async fn start_with(mut config: ServerConfig) -> Self {
        config.host = "127.0.0.1".to_string();
        let listener = Listener::bind(Arc::new(config), 0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel();
        let handle = tokio::spawn(listener.serve_until(async move { rx.await.unwrap_or(SIGINT) }));
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    pub async fn stop(self) -> ShutdownReport {
        let _ = self.shutdown.send(SIGINT);
        self.handle.await.unwrap()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GetResult {
    /// Payloads in arrival order.
    Chunks(Vec<Vec<u8>>),
    NotFound,
}

impl GetResult {
    pub fn bytes(&self) -> Vec<u8> {
        match self {
            GetResult::Chunks(chunks) => chunks.concat(),
            GetResult::NotFound => panic!("file was not found"),
        }
    }
}

/// A data-channel listener on an ephemeral loopback port.
pub async fn data_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

async fn read_reply(control: &mut TcpStream) -> Vec<u8> {
    let mut buffer = vec![0u8; 512];
    let n = control.read(&mut buffer).await.unwrap();
    buffer.truncate(n);
    buffer
}

pub async fn get_file(server: SocketAddr, name: &str) -> GetResult {
    get_file_raw(server, name.as_bytes()).await
}

/// Requests a file by its exact on-disk name bytes.
pub async fn get_file_raw(server: SocketAddr, name: &[u8]) -> GetResult {
    let (data, port) = data_listener().await;
    let mut control = TcpStream::connect(server).await.unwrap();
    let mut request = format!("g {} ", port).into_bytes();
    request.extend_from_slice(name);
    request.push(b'\n');
    control.write_all(&request).await.unwrap();

    let reply = read_reply(&mut control).await;
    if reply.starts_with(b"FILE NOT FOUND") {
        return GetResult::NotFound;
    }
    assert_eq!(reply, b"ready\0".to_vec());
    control.write_all(b"ready\n").await.unwrap();

    let (mut data_stream, _) = data.accept().await.unwrap();
    let mut chunks = Vec::new();
    while let Some(payload) = read_chunk(&mut data_stream).await.unwrap() {
        chunks.push(payload);
        control.write_all(b"ok\n").await.unwrap();
    }
    GetResult::Chunks(chunks)
}

/// Each listed name exactly as it arrived on the data channel.
pub async fn list_directory(server: SocketAddr) -> Vec<Vec<u8>> {
    let (data, port) = data_listener().await;
    let mut control = TcpStream::connect(server).await.unwrap();
    control
        .write_all(format!("l {}\n", port).as_bytes())
        .await
        .unwrap();

    assert_eq!(read_reply(&mut control).await, b"ready\0".to_vec());
    control.write_all(b"ready\n").await.unwrap();

    let (mut data_stream, _) = data.accept().await.unwrap();
    let mut names = Vec::new();
    let mut buffer = vec![0u8; 512];
    loop {
        let n = data_stream.read(&mut buffer).await.unwrap();
        if n == 0 {
            break;
        }
        names.push(buffer[..n].to_vec());
        control.write_all(b"ok\n").await.unwrap();
    }
    names
}

/// Deterministic bytes that include NULs and every other byte value.
pub fn pattern(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}
