//! Request and response types for narrative generation

use oox_domain::{CategoryCode, HealthStatus, OrderElement, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Title used when generation fails
pub const PLACEHOLDER_TITLE: &str = "Analysis Error";

/// Description used when generation fails
pub const PLACEHOLDER_DESCRIPTION: &str =
    "Sorry, the analysis service is busy right now and the description could not be generated.";

/// Everything the model is told about one user's result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeRequest {
    /// Final order, most preferred first; blocks are allowed
    pub final_order: Vec<OrderElement>,

    /// Health status per code
    pub health: BTreeMap<CategoryCode, HealthStatus>,

    /// Tier per code
    pub tiers: BTreeMap<CategoryCode, Tier>,
}

impl NarrativeRequest {
    /// Create a request with empty health and tier maps
    pub fn new(final_order: Vec<OrderElement>) -> Self {
        Self {
            final_order,
            health: BTreeMap::new(),
            tiers: BTreeMap::new(),
        }
    }

    /// Attach health statuses
    pub fn with_health(mut self, health: impl IntoIterator<Item = (CategoryCode, HealthStatus)>) -> Self {
        self.health = health.into_iter().collect();
        self
    }

    /// Attach tiers
    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = (CategoryCode, Tier)>) -> Self {
        self.tiers = tiers.into_iter().collect();
        self
    }

    /// Check that the request names at least one code
    pub fn validate(&self) -> Result<(), String> {
        if self.final_order.is_empty() {
            return Err("final order is empty".to_string());
        }
        Ok(())
    }
}

/// Generated narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Short catchy title
    pub title: String,

    /// Body text addressed to the user
    pub description: String,
}

impl Narrative {
    /// Create a narrative
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// The pair returned when generation fails
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_TITLE, PLACEHOLDER_DESCRIPTION)
    }

    /// Whether this is the failure placeholder
    pub fn is_placeholder(&self) -> bool {
        self.title == PLACEHOLDER_TITLE && self.description == PLACEHOLDER_DESCRIPTION
    }
}
