//! HTTP request handlers for the OoX service.
//!
//! Implements ranking, asynchronous narrative jobs and health check
//! endpoints using axum.

use crate::config::JobsConfig;
use crate::dto::{
    AcceptedResponse, CalculateRequest, CalculateResponse, DescribeRequest, HealthCheckResponse,
    MatchDto, NotFoundResponse, OrderElementDto,
};
use crate::jobs::{JobRecord, JobStore};
use crate::worker::JobRunner;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use oox_domain::traits::LlmProvider;
use oox_domain::{get_final_order, HealthTally, Match};
use oox_narrator::Narrator;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Message returned for unknown or expired job ids
pub const JOB_NOT_FOUND_MESSAGE: &str = "The specified job ID was not found.";

/// Shared application state
pub struct AppState<P: LlmProvider> {
    /// Background runner for describe jobs
    pub runner: JobRunner<P>,
    /// Provider name reported by `/health`
    pub provider_name: String,
}

impl<P: LlmProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            runner: self.runner.clone(),
            provider_name: self.provider_name.clone(),
        }
    }
}

impl<P: LlmProvider + 'static> AppState<P> {
    /// Build state around a narrator with a fresh job store
    pub fn new(narrator: Narrator<P>, jobs: &JobsConfig, provider_name: impl Into<String>) -> Self {
        let store = Arc::new(JobStore::new(jobs.timeout(), jobs.result_ttl()));
        Self {
            runner: JobRunner::new(narrator, store, jobs.timeout()),
            provider_name: provider_name.into(),
        }
    }

    /// Job store shared with the runner
    pub fn jobs(&self) -> &Arc<JobStore> {
        self.runner.jobs()
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body failed validation
    Validation(String),
    /// Request body could not be read as JSON of the expected shape
    MalformedBody(StatusCode, String),
    /// Job id unknown or expired
    JobNotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => {
                let body = Json(ErrorResponse { error: message });
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::MalformedBody(status, message) => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            AppError::JobNotFound => {
                let body = Json(NotFoundResponse {
                    status: "not_found".to_string(),
                    message: JOB_NOT_FOUND_MESSAGE.to_string(),
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.status(), rejection.body_text())
    }
}

/// POST /api/calculate - Compute the final order and health statuses
async fn calculate(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>, AppError> {
    let Json(request) = payload?;
    let matches = request
        .matches
        .into_iter()
        .map(MatchDto::into_match)
        .collect::<Result<Vec<Match>, _>>()
        .map_err(AppError::Validation)?;

    let order = get_final_order(&matches);

    let mut tally = HealthTally::new();
    for answer in request.health_answers {
        tally
            .record_answer(&answer.target, answer.value)
            .map_err(AppError::Validation)?;
    }
    let health: BTreeMap<String, String> = tally
        .report(&matches)
        .into_iter()
        .map(|(code, status)| (code.to_string(), status.as_str().to_string()))
        .collect();

    info!(
        matches = matches.len(),
        elements = order.len(),
        conflicts = order.iter().filter(|e| e.is_block()).count(),
        "Calculated final order"
    );

    Ok(Json(CalculateResponse {
        order: order.iter().map(OrderElementDto::from).collect(),
        health,
    }))
}

/// POST /api/describe - Queue narrative generation, answer 202 immediately
async fn describe<P>(
    State(state): State<AppState<P>>,
    payload: Result<Json<DescribeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AcceptedResponse>), AppError>
where
    P: LlmProvider + 'static,
{
    let Json(request) = payload?;
    let request = request
        .into_narrative_request()
        .map_err(AppError::Validation)?;

    let id = state.jobs().create().await;
    // Detached; the job store carries the outcome
    state.runner.spawn(id, request);
    info!(%id, "Describe job accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            message: "Accepted".to_string(),
            job_id: id.to_string(),
        }),
    ))
}

/// GET /api/describe/status/:job_id - Poll a describe job
async fn describe_status<P>(
    State(state): State<AppState<P>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobRecord>, AppError>
where
    P: LlmProvider + 'static,
{
    let id = Uuid::parse_str(&job_id).map_err(|_| AppError::JobNotFound)?;
    let record = state.jobs().get(id).await.ok_or(AppError::JobNotFound)?;
    debug!(%id, status = ?record.status, "Describe job polled");
    Ok(Json(record))
}

/// GET /health - Liveness and job count
async fn health_check<P>(State(state): State<AppState<P>>) -> Json<HealthCheckResponse>
where
    P: LlmProvider + 'static,
{
    let jobs = state.jobs();
    jobs.purge_expired().await;
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        provider: state.provider_name.clone(),
        jobs: jobs.len().await,
    })
}

/// Create the axum router with all routes
pub fn create_router<P>(state: AppState<P>) -> AxumRouter
where
    P: LlmProvider + 'static,
{
    AxumRouter::new()
        .route("/api/calculate", post(calculate))
        .route("/api/describe", post(describe::<P>))
        .route("/api/describe/status/:job_id", get(describe_status::<P>))
        .route("/health", get(health_check::<P>))
        .with_state(state)
}
