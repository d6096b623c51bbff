//! HTTP client for the OoX server's describe API

use crate::error::{CliError, Result};
use oox_domain::{CategoryCode, HealthStatus, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// `POST /api/describe` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeBody {
    /// Resolved order, most preferred first
    pub final_order: Vec<String>,
    /// `O` / `o` / `x` per code
    pub health_status: BTreeMap<String, String>,
    /// Tier name per code
    pub tier_map: BTreeMap<String, String>,
}

impl DescribeBody {
    /// Build a body from a tiered ranking and health statuses
    pub fn new(ranking: &[(CategoryCode, Tier)], health: &[(CategoryCode, HealthStatus)]) -> Self {
        Self {
            final_order: ranking.iter().map(|(code, _)| code.to_string()).collect(),
            health_status: health
                .iter()
                .map(|(code, status)| (code.to_string(), status.as_str().to_string()))
                .collect(),
            tier_map: ranking
                .iter()
                .map(|(code, tier)| (code.to_string(), tier.as_str().to_string()))
                .collect(),
        }
    }
}

/// A generated title and description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Short title
    pub title: String,
    /// Prose description
    pub description: String,
}

/// State of a describe job as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Accepted, not started
    Pending,
    /// Generation running
    Processing,
    /// Narrative available
    Completed,
    /// Error message available
    Failed,
}

/// `GET /api/describe/status/{job_id}` body
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusBody {
    /// Current state
    pub status: JobState,
    /// Narrative, once completed
    #[serde(default)]
    pub data: Option<Narrative>,
    /// Message, once failed
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AcceptedBody {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for one OoX server
#[derive(Debug, Clone)]
pub struct OoxClient {
    base_url: String,
    http: reqwest::Client,
}

impl OoxClient {
    /// Create a client for `base_url`, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Server this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a describe request and return the job id
    pub async fn submit(&self, body: &DescribeBody) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/api/describe", self.base_url))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }
        let accepted: AcceptedBody = response.json().await?;
        Ok(accepted.job_id)
    }

    /// Fetch the current status of a job
    pub async fn status(&self, job_id: &str) -> Result<JobStatusBody> {
        let response = self
            .http
            .get(format!("{}/api/describe/status/{}", self.base_url, job_id))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CliError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(server_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Poll a job every `interval` until it finishes
    pub async fn wait_for(&self, job_id: &str, interval: Duration) -> Result<Narrative> {
        loop {
            let body = self.status(job_id).await?;
            match body.status {
                JobState::Completed => {
                    return body.data.ok_or_else(|| CliError::Server {
                        status: 200,
                        message: "completed job carried no narrative".to_string(),
                    });
                }
                JobState::Failed => {
                    return Err(CliError::JobFailed(
                        body.error.unwrap_or_else(|| "unknown error".to_string()),
                    ));
                }
                JobState::Pending | JobState::Processing => tokio::time::sleep(interval).await,
            }
        }
    }
}

async fn server_error(response: reqwest::Response) -> CliError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or(text);
    CliError::Server { status, message }
}
