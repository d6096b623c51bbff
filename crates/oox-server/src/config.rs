//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, log level, the
//! narrative provider and describe-job lifetimes. Every field has a default,
//! so an empty file is a valid configuration.

use oox_narrator::NarratorConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Which generative-language backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini over HTTP
    #[default]
    Gemini,
    /// Canned responses, no network
    Mock,
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (default: 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Narrative provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Describe-job lifetimes
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Prompt limits and per-call timeout
    #[serde(default)]
    pub narrator: NarratorConfig,
}

/// `[llm]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: ProviderKind,

    /// API base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Per-request HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per generation
    pub max_retries: u32,

    /// Response returned by the mock provider
    pub mock_response: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            endpoint: oox_llm::gemini::DEFAULT_ENDPOINT.to_string(),
            model: oox_llm::gemini::DEFAULT_MODEL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: oox_llm::gemini::DEFAULT_TIMEOUT_SECS,
            max_retries: oox_llm::gemini::DEFAULT_MAX_RETRIES,
            mock_response: "# Title\nMock Result\n\n# Description\nGenerated without a model."
                .to_string(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingField(format!(
                "llm.api_key_env ({} is not set)",
                self.api_key_env
            ))),
        }
    }

    /// Per-request HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[jobs]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Upper bound on one describe job, in seconds (default: 600)
    pub timeout_secs: u64,

    /// How long finished results stay readable, in seconds (default: 3600)
    pub result_ttl_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 600,
            result_ttl_secs: 3600,
        }
    }
}

impl JobsConfig {
    /// Job timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Result retention as a Duration
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Largest accepted `llm.max_retries`
pub const MAX_LLM_RETRIES: u32 = 10;

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that TOML types alone cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        if self.jobs.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "jobs.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm.max_retries == 0 || self.llm.max_retries > MAX_LLM_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "llm.max_retries must be between 1 and {}",
                MAX_LLM_RETRIES
            )));
        }
        if self.llm.provider == ProviderKind::Gemini && self.llm.model.is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        self.narrator.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Create a default configuration for testing (mock provider)
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            log_level: default_log_level(),
            llm: LlmConfig {
                provider: ProviderKind::Mock,
                ..Default::default()
            },
            jobs: JobsConfig::default(),
            narrator: NarratorConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
