//! In-memory describe-job store
//!
//! Each job moves `pending → processing → completed | failed`. In-flight
//! entries live for the job timeout; finished entries live for the result TTL.
//! Expired entries are dropped lazily whenever the store is touched.

use oox_narrator::Narrative;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

/// Lifecycle state of a describe job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not started
    Pending,
    /// Narrative generation running
    Processing,
    /// Result available in `data`
    Completed,
    /// Message available in `error`
    Failed,
}

impl JobStatus {
    /// Whether the job will not change any more
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// What a status poll returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Current status
    pub status: JobStatus,

    /// Narrative, once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Narrative>,

    /// User-facing message, once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    fn in_flight(status: JobStatus) -> Self {
        Self {
            status,
            data: None,
            error: None,
        }
    }
}

struct Entry {
    record: JobRecord,
    expires_at: Instant,
}

/// Job records keyed by job id
pub struct JobStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
    in_flight_ttl: Duration,
    result_ttl: Duration,
}

impl JobStore {
    /// Create a store
    ///
    /// `in_flight_ttl` bounds pending/processing entries (the job timeout);
    /// `result_ttl` bounds completed/failed entries.
    pub fn new(in_flight_ttl: Duration, result_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight_ttl,
            result_ttl,
        }
    }

    /// Register a new pending job and return its id
    pub async fn create(&self) -> Uuid {
        let id = Uuid::now_v7();
        let mut entries = self.entries.write().await;
        purge(&mut entries);
        entries.insert(
            id,
            Entry {
                record: JobRecord::in_flight(JobStatus::Pending),
                expires_at: Instant::now() + self.in_flight_ttl,
            },
        );
        id
    }

    /// Move a job to `processing`
    pub async fn mark_processing(&self, id: Uuid) {
        self.put(id, JobRecord::in_flight(JobStatus::Processing), self.in_flight_ttl)
            .await;
    }

    /// Store a finished narrative
    pub async fn complete(&self, id: Uuid, narrative: Narrative) {
        let record = JobRecord {
            status: JobStatus::Completed,
            data: Some(narrative),
            error: None,
        };
        self.put(id, record, self.result_ttl).await;
    }

    /// Store a failure message
    pub async fn fail(&self, id: Uuid, message: impl Into<String>) {
        let record = JobRecord {
            status: JobStatus::Failed,
            data: None,
            error: Some(message.into()),
        };
        self.put(id, record, self.result_ttl).await;
    }

    /// Current record, or `None` for unknown or expired ids
    pub async fn get(&self, id: Uuid) -> Option<JobRecord> {
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.record.clone())
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        purge(&mut entries)
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    /// Whether there are no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn put(&self, id: Uuid, record: JobRecord, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            id,
            Entry {
                record,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

fn purge(entries: &mut HashMap<Uuid, Entry>) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    before - entries.len()
}
