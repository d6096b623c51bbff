//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("Config file: {}", path.display());
            println!("  server_url:       {}", config.server_url);
            println!("  poll_interval_ms: {}", config.poll_interval_ms);
            println!("  format:           {:?}", config.format);
            println!("  color:            {}", config.color);
            Ok(())
        }
        ConfigAction::SetServer { url } => {
            config.server_url = url;
            save(config, path, formatter, "Server URL updated")
        }
        ConfigAction::SetPollInterval { millis } => {
            config.poll_interval_ms = millis;
            save(config, path, formatter, "Poll interval updated")
        }
    }
}

fn save(config: &Config, path: &Path, formatter: &Formatter, message: &str) -> Result<()> {
    config.validate()?;
    config.save_to(path)?;
    println!("{}", formatter.success(message));
    Ok(())
}
