//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (oox-llm). Generation is
/// asynchronous; implementors may write `async fn generate`.
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a text completion for `prompt`
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Short provider name for logs
    fn name(&self) -> &str;
}
