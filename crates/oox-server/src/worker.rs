//! Background runner for describe jobs

use crate::jobs::JobStore;
use oox_domain::traits::LlmProvider;
use oox_narrator::{Narrative, NarrativeRequest, Narrator, NarratorError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Message stored for any failed job
pub const JOB_FAILED_MESSAGE: &str = "Generation failed. Please try again.";

/// Runs describe jobs against a narrator
pub struct JobRunner<P: LlmProvider> {
    narrator: Narrator<P>,
    jobs: Arc<JobStore>,
    job_timeout: Duration,
}

impl<P: LlmProvider> Clone for JobRunner<P> {
    fn clone(&self) -> Self {
        Self {
            narrator: self.narrator.clone(),
            jobs: Arc::clone(&self.jobs),
            job_timeout: self.job_timeout,
        }
    }
}

impl<P> JobRunner<P>
where
    P: LlmProvider + 'static,
{
    /// Create a runner
    pub fn new(narrator: Narrator<P>, jobs: Arc<JobStore>, job_timeout: Duration) -> Self {
        Self {
            narrator,
            jobs,
            job_timeout,
        }
    }

    /// Job store results are written to
    pub fn jobs(&self) -> &Arc<JobStore> {
        &self.jobs
    }

    /// Run job `id` in the background
    ///
    /// The returned handle resolves once the job record is terminal.
    pub fn spawn(&self, id: Uuid, request: NarrativeRequest) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move { runner.supervise(id, request).await })
    }

    /// Run the job in its own task so a panic still ends in `failed`
    async fn supervise(self, id: Uuid, request: NarrativeRequest) {
        let jobs = Arc::clone(&self.jobs);
        let task = tokio::spawn(async move { self.run(id, request).await });

        if let Err(e) = task.await {
            error!(%id, "Describe job task aborted: {}", e);
            jobs.fail(id, JOB_FAILED_MESSAGE).await;
        }
    }

    async fn run(&self, id: Uuid, request: NarrativeRequest) {
        self.jobs.mark_processing(id).await;
        info!(%id, "Describe job started");

        match timeout(self.job_timeout, self.narrator.describe(&request)).await {
            Ok(Ok(narrative)) => {
                info!(%id, "Describe job completed");
                self.jobs.complete(id, narrative).await;
            }
            Ok(Err(NarratorError::InvalidRequest(message))) => {
                warn!(%id, "Describe job rejected: {}", message);
                self.jobs.fail(id, JOB_FAILED_MESSAGE).await;
            }
            Ok(Err(e)) => {
                // Provider trouble still yields a readable result
                error!(%id, "Narrative generation failed: {}", e);
                self.jobs.complete(id, Narrative::placeholder()).await;
            }
            Err(_) => {
                error!(%id, timeout_secs = self.job_timeout.as_secs(), "Describe job timed out");
                self.jobs.fail(id, JOB_FAILED_MESSAGE).await;
            }
        }
    }
}
