use crate::config::ServerConfig;
use crate::constants::SIGINT;
use crate::core_network::worker::{handle_connection, WorkerStatus};
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{lookup_host, TcpListener, TcpSocket};
use tokio::task::{AbortHandle, JoinError, JoinSet};

/// Counters handed back once the accept loop stops.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub spawned: usize,
    pub reaped: usize,
    pub failed: usize,
    pub still_running: usize,
}

impl ShutdownReport {
    fn reap(&mut self, joined: std::result::Result<WorkerStatus, JoinError>) {
        self.reaped += 1;
        match joined {
            Ok(status) => {
                debug!("Reaped worker with status {}", status.code());
                if status == WorkerStatus::Failed {
                    self.failed += 1;
                }
            }
            Err(e) if e.is_cancelled() => debug!("Reaped cancelled worker"),
            Err(e) => {
                error!("Worker panicked: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// The bound control socket and the settings every worker gets a copy of.
pub struct Listener {
    listener: TcpListener,
    port: u16,
    config: Arc<ServerConfig>,
}

impl Listener {
    /// Resolves the configured host and binds the first candidate that works.
    /// IPv4 candidates are tried before IPv6 ones.
    pub async fn bind(config: Arc<ServerConfig>, port: u16) -> Result<Self> {
        let mut candidates: Vec<SocketAddr> = lookup_host((config.host.as_str(), port))
            .await
            .with_context(|| format!("getaddrinfo error for {}:{}", config.host, port))?
            .collect();
        candidates.sort_by_key(|addr| addr.is_ipv6());

        let mut last_error = None;
        for addr in candidates {
            match bind_and_listen(addr, config.backlog) {
                Ok(listener) => {
                    let port = listener.local_addr()?.port();
                    return Ok(Self {
                        listener,
                        port,
                        config,
                    });
                }
                Err(e) => {
                    warn!("Server: bind {}: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) => anyhow::Error::new(e).context(format!("Server: failed to bind {}:{}", config.host, port)),
            None => anyhow!("Server: no address found for {}:{}", config.host, port),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves with a signal number.
    ///
    /// Every connection gets its own worker task. Finished workers are reaped
    /// inside the loop. On shutdown only the most recently spawned worker is
    /// aborted explicitly; the rest end when the task set is dropped.
    pub async fn serve_until<F>(self, shutdown: F) -> ShutdownReport
    where
        F: Future<Output = i32>,
    {
        tokio::pin!(shutdown);
        let mut workers: JoinSet<WorkerStatus> = JoinSet::new();
        let mut foreground: Option<AbortHandle> = None;
        let mut report = ShutdownReport::default();

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    if let Some(handle) = foreground.take() {
                        handle.abort();
                    }
                    info!("Terminated by signal {}", signal);
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        let handle = workers.spawn(handle_connection(
                            socket,
                            peer,
                            self.port,
                            Arc::clone(&self.config),
                        ));
                        foreground = Some(handle);
                        report.spawned += 1;
                    }
                    Err(e) => error!("Accept: {}", e),
                },
                Some(joined) = workers.join_next(), if !workers.is_empty() => {
                    report.reap(joined);
                }
            }
        }

        while let Some(joined) = workers.try_join_next() {
            report.reap(joined);
        }
        report.still_running = workers.len();
        report
    }
}

fn bind_and_listen(addr: SocketAddr, backlog: u32) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

/// Resolves on the first interrupt with its signal number.
pub async fn interrupt_signal() -> i32 {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Sigaction - SIGINT: {}", e);
        std::future::pending::<()>().await;
    }
    SIGINT
}

pub async fn start_server(config: Arc<ServerConfig>, port: u16) -> Result<ShutdownReport> {
    let listener = Listener::bind(config, port).await?;
    info!("Server open on {}", listener.port);
    Ok(listener.serve_until(interrupt_signal()).await)
}
