//! Error types for the Narrator

use thiserror::Error;

/// Errors that can occur during narrative generation
#[derive(Error, Debug)]
pub enum NarratorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Generation timeout
    #[error("Generation timeout after {0}s")]
    Timeout(u64),

    /// Request does not describe a ranking
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON encoding error while building the prompt
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for NarratorError {
    fn from(e: serde_json::Error) -> Self {
        NarratorError::Json(e.to_string())
    }
}
