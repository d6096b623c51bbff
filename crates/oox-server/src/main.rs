//! OoX server binary
//!
//! Starts the HTTP server for ranking and narrative generation.

use clap::Parser;
use oox_server::{config::ServerConfig, start_server, ServerError};
use std::path::PathBuf;
use std::process;

/// OoX ranking and narrative server
#[derive(Debug, Parser)]
#[command(name = "oox-server", version, about)]
struct Args {
    /// Load configuration from a TOML file
    #[arg(short, long, env = "OOX_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            eprintln!("Warning: No config file specified, using defaults");
            eprintln!("Usage: oox-server --config <path-to-config.toml>");
            eprintln!();
            ServerConfig::from_toml("")?
        }
    };

    if let Some(port) = args.port {
        config.bind_port = port;
    }

    start_server(config).await
}
