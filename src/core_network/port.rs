use crate::core_network::error::{Result, TransferError};
use log::{error, info};
use tokio::net::{lookup_host, TcpStream};

/// Opens the data channel back to the client.
///
/// The server is always the initiator here. `(host, port)` is resolved and the
/// candidates are tried in order; the first successful connection wins.
/// Port 0 never names a client listener and fails without a connect attempt.
pub async fn setup_port_connection(host: &str, port: u16) -> Result<TcpStream> {
    if port == 0 {
        error!("No data port to connect to on {}", host);
        return Err(TransferError::DataConnect {
            host: host.to_string(),
            port,
        });
    }

    let candidates = lookup_host((host, port))
        .await
        .map_err(|source| {
            error!("getaddrinfo {}:{}: {}", host, port, source);
            TransferError::Resolve {
                host: host.to_string(),
                port,
                source,
            }
        })?;

    for addr in candidates {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                info!("Data connection established with {}", addr);
                return Ok(stream);
            }
            Err(e) => error!("Data connect {}: {}", addr, e),
        }
    }

    error!("Failed to connect to {}:{}", host, port);
    Err(TransferError::DataConnect {
        host: host.to_string(),
        port,
    })
}
