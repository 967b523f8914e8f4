use anyhow::Result;
use ftserve::config::Config;
use ftserve::core_cli::Cli;
use ftserve::core_log::logger::init_logger;
use ftserve::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse_or_exit();

    init_logger(args.verbose);

    // Load configuration from the TOML file, if one was given
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    // Run the file transfer server
    server::run(config, args.port).await?;

    Ok(())
}
