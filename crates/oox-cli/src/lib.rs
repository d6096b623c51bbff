//! OoX CLI library.
//!
//! Ranks quiz results locally, walks the user through conflict blocks and
//! talks to the OoX server for narrative generation.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
