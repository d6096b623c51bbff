//! OoX Server
//!
//! HTTP front for the ranking engine: computes final orders synchronously and
//! generates narratives through asynchronous, pollable jobs.

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod handlers;
pub mod jobs;
pub mod provider;
pub mod worker;

use config::ServerConfig;
use handlers::{create_router, AppState};
use oox_domain::traits::LlmProvider;
use oox_narrator::Narrator;
use provider::ConfiguredProvider;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `log_level`. Calling this twice is harmless.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the HTTP server
///
/// Builds the configured provider, narrator and job store, and serves until
/// the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing(&config.log_level);

    info!("Starting OoX server");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Job timeout: {}s, result TTL: {}s",
        config.jobs.timeout_secs, config.jobs.result_ttl_secs
    );

    let provider = ConfiguredProvider::from_config(&config.llm)?;
    let provider_name = provider.name().to_string();
    info!("Narrative provider: {}", provider_name);

    let narrator = Narrator::new(provider, config.narrator.clone());
    let state = AppState::new(narrator, &config.jobs, provider_name);

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
