//! Configuration for the Narrator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Narrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Maximum title length requested from the model (characters)
    pub title_max_chars: usize,

    /// Approximate description length requested from the model (characters)
    pub description_target_chars: usize,

    /// Maximum time for a single generation call (seconds)
    pub generation_timeout_secs: u64,
}

impl NarratorConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.title_max_chars == 0 {
            return Err("title_max_chars must be greater than 0".to_string());
        }
        if self.description_target_chars == 0 {
            return Err("description_target_chars must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            title_max_chars: 20,
            description_target_chars: 300,
            generation_timeout_secs: 120,
        }
    }
}
