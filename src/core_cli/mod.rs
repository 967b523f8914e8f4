use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "ftserve",
    version,
    about = "A file transfer server with a server-initiated data channel.",
    after_help = "Description: port number between 1 and 65535 must be provided\nExample: ftserve 29658"
)]
pub struct Cli {
    /// Control port to listen on
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses the process arguments. Usage errors print to stderr and exit
    /// with status 1; `--help` and `--version` exit 0.
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
                _ => {
                    let rendered = e.render().to_string();
                    eprint!("{}", rendered);
                    if !rendered.contains("Usage:") {
                        eprintln!("\n{}", Cli::command().render_usage());
                    }
                    std::process::exit(1);
                }
            },
        }
    }
}
