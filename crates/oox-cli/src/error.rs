//! Error types for the CLI application.

use oox_domain::ResolutionError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not reach the server
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("Server returned {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error text from the response body
        message: String,
    },

    /// The job id is unknown or its result expired
    #[error("Job {0} not found on the server")]
    JobNotFound(String),

    /// The describe job ended in `failed`
    #[error("Narrative generation failed: {0}")]
    JobFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Conflict resolution error
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The user left the interactive prompt
    #[error("Resolution cancelled")]
    Cancelled,
}
