//! OoX CLI - rank quiz results, resolve conflicts and request narratives.

use clap::Parser;
use oox_cli::commands;
use oox_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> oox_cli::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    let format = cli.format.map(Into::into).unwrap_or(config.format);
    let color_enabled = !cli.no_color && config.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Rank(args) => commands::execute_rank(args, &formatter)?,
        Command::Resolve(args) => commands::execute_resolve(args, &formatter)?,
        Command::Describe(args) => commands::execute_describe(args, &config, &formatter).await?,
        Command::Config(args) => {
            commands::execute_config(args, &mut config, &config_path, &formatter)?
        }
    }

    Ok(())
}
