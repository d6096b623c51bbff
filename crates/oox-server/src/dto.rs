//! JSON shapes of the HTTP API and their conversion to domain types

use oox_domain::{CategoryCode, HealthStatus, Match, OrderElement, Tier};
use oox_narrator::NarrativeRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One match as sent by the quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDto {
    /// Preferred code
    pub winner: String,
    /// Other code
    pub loser: String,
    /// Question id, string or number; kept for traceability only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

impl MatchDto {
    /// Convert to a domain match, rejecting self-matches
    pub fn into_match(self) -> Result<Match, String> {
        Match::answer(&self.winner, &self.loser, source_id(self.id))
    }
}

/// Question ids may be strings or numbers; strings are taken verbatim
fn source_id(id: Option<serde_json::Value>) -> Option<String> {
    match id? {
        serde_json::Value::Null => None,
        serde_json::Value::String(id) => Some(id),
        other => Some(other.to_string()),
    }
}

/// One health question answer: `value` 1 leans healthy, 0 unhealthy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAnswerDto {
    /// Code the question is about
    pub target: String,
    /// 0 or 1
    pub value: u8,
}

/// `POST /api/calculate` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// Pairwise results
    #[serde(default)]
    pub matches: Vec<MatchDto>,
    /// Health question answers
    #[serde(default)]
    pub health_answers: Vec<HealthAnswerDto>,
}

/// `POST /api/calculate` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    /// Final order, most preferred first
    pub order: Vec<OrderElementDto>,
    /// `O` / `o` / `x` per code
    pub health: BTreeMap<String, String>,
}

/// A code, or an array of codes for a conflict block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderElementDto {
    /// Uncontested rank
    Single(String),
    /// Conflict block
    Block(Vec<String>),
}

impl From<&OrderElement> for OrderElementDto {
    fn from(element: &OrderElement) -> Self {
        match element {
            OrderElement::Single(code) => OrderElementDto::Single(code.to_string()),
            OrderElement::Block(codes) => {
                OrderElementDto::Block(codes.iter().map(CategoryCode::to_string).collect())
            }
        }
    }
}

impl OrderElementDto {
    /// Convert to a domain element; a one-code array becomes a single
    pub fn into_element(self) -> Result<OrderElement, String> {
        match self {
            OrderElementDto::Single(code) => Ok(OrderElement::Single(CategoryCode::new(code)?)),
            OrderElementDto::Block(codes) => {
                let mut codes = codes
                    .into_iter()
                    .map(CategoryCode::new)
                    .collect::<Result<Vec<_>, _>>()?;
                match codes.len() {
                    0 => Err("Order element must not be an empty array".to_string()),
                    1 => Ok(OrderElement::Single(codes.remove(0))),
                    _ => Ok(OrderElement::Block(codes)),
                }
            }
        }
    }
}

/// `POST /api/describe` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRequest {
    /// Final order, most preferred first
    pub final_order: Vec<OrderElementDto>,
    /// `O` / `o` / `x` per code
    pub health_status: BTreeMap<String, String>,
    /// Tier name per code; nulls are ignored
    pub tier_map: BTreeMap<String, Option<String>>,
}

impl DescribeRequest {
    /// Validate and convert into a narrative request
    pub fn into_narrative_request(self) -> Result<NarrativeRequest, String> {
        if self.final_order.is_empty() {
            return Err("finalOrder must not be empty".to_string());
        }
        let order = self
            .final_order
            .into_iter()
            .map(OrderElementDto::into_element)
            .collect::<Result<Vec<_>, _>>()?;

        let mut health = Vec::with_capacity(self.health_status.len());
        for (code, value) in self.health_status {
            let status = HealthStatus::parse(&value)
                .ok_or_else(|| format!("healthStatus.{} must be one of O, o, x", code))?;
            health.push((CategoryCode::new(code)?, status));
        }

        let mut tiers = Vec::with_capacity(self.tier_map.len());
        for (code, value) in self.tier_map {
            let Some(value) = value else { continue };
            let tier = match value.as_str() {
                "Dominant" | "High" | "Middle" | "Low" => Tier::parse(&value),
                _ => None,
            }
            .ok_or_else(|| format!("tierMap.{} must be one of Dominant, High, Middle, Low", code))?;
            tiers.push((CategoryCode::new(code)?, tier));
        }

        Ok(NarrativeRequest::new(order)
            .with_health(health)
            .with_tiers(tiers))
    }
}

/// `POST /api/describe` response (202)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedResponse {
    /// Always "Accepted"
    pub message: String,
    /// Id to poll
    pub job_id: String,
}

/// Unknown or expired job id (404)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotFoundResponse {
    /// Always "not_found"
    pub status: String,
    /// Human-readable explanation
    pub message: String,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Provider in use
    pub provider: String,
    /// Live job records
    pub jobs: usize,
}
