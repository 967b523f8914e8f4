use crate::config::Config;
use crate::core_network::network;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the file transfer server on `port` until an interrupt arrives.
///
/// Bind and listen failures are returned; everything that goes wrong inside a
/// worker stays inside that worker.
pub async fn run(config: Config, port: u16) -> Result<()> {
    log_config(&config, port);

    match network::start_server(Arc::new(config.server), port).await {
        Ok(report) => {
            info!(
                "Server stopped: {} connections, {} reaped, {} failed, {} still running.",
                report.spawned, report.reaped, report.failed, report.still_running
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to start server: {:#}", e);
            Err(e)
        }
    }
}

fn log_config(config: &Config, port: u16) {
    info!("  Listen Port: {}", port);
    info!("  Host: {}", config.server.host);
    info!("  Root Directory: {}", config.server.root_dir.display());
    info!("  Backlog: {}", config.server.backlog);
    match config.server.ack_timeout_secs {
        Some(secs) => info!("  Ack Timeout: {}s", secs),
        None => info!("  Ack Timeout: none"),
    }
}
