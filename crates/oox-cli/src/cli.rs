//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// OoX CLI - Rank quiz results and describe the outcome.
#[derive(Debug, Parser)]
#[command(name = "oox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "OOX_CLI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (codes only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the final order of a results file
    Rank(RankArgs),

    /// Rank conflict blocks interactively and print the resolved order
    Resolve(ResolveArgs),

    /// Resolve, then ask the server for a narrative
    Describe(DescribeArgs),

    /// Show or change CLI settings
    Config(ConfigArgs),
}

/// Arguments for the rank command.
#[derive(Debug, Parser)]
pub struct RankArgs {
    /// Results file: a JSON array of matches or `{"matches": [...]}`
    pub file: PathBuf,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Results file
    pub file: PathBuf,

    /// Tier override, e.g. `--tier Ni=Low` (repeatable)
    #[arg(short, long = "tier", value_name = "CODE=TIER")]
    pub tiers: Vec<String>,
}

/// Arguments for the describe command.
#[derive(Debug, Parser)]
pub struct DescribeArgs {
    /// Results file
    pub file: PathBuf,

    /// Tier override, e.g. `--tier Ni=Low` (repeatable)
    #[arg(short, long = "tier", value_name = "CODE=TIER")]
    pub tiers: Vec<String>,

    /// Server URL, overrides the configured one
    #[arg(short, long, env = "OOX_SERVER_URL")]
    pub server: Option<String>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show current settings
    Show,

    /// Set the server URL
    SetServer {
        /// Base URL, e.g. http://127.0.0.1:8000
        url: String,
    },

    /// Set how often describe polls the job status
    SetPollInterval {
        /// Interval in milliseconds
        millis: u64,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_describe() {
        let cli = Cli::try_parse_from([
            "oox", "--format", "json", "describe", "results.json", "--tier", "Ni=Low", "-t",
            "Fe=High",
        ])
        .unwrap();
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Describe(args) => {
                assert_eq!(args.file, PathBuf::from("results.json"));
                assert_eq!(args.tiers, vec!["Ni=Low", "Fe=High"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_set_server() {
        let cli = Cli::try_parse_from(["oox", "config", "set-server", "http://host:9000"]).unwrap();
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::SetServer { url },
            }) => assert_eq!(url, "http://host:9000"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["oox"]).is_err());
    }
}
