//! Ephemeral job records for background conversation analysis.
//!
//! A job moves pending → processing → completed | failed and is polled by the
//! client via /api/check-job-status. Records expire after an hour.

pub mod file_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Evaluation payload, present once status is `completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure message, present once status is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    pub fn new() -> Self {
        let now = Utc::now();
        JobRecord {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Job persistence seam. Carried in `AppState` as `Arc<dyn JobStore>`.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self) -> Result<JobRecord, AppError>;

    /// Returns None for unknown ids and for records past their TTL.
    async fn get(&self, id: Uuid) -> Result<Option<JobRecord>, AppError>;

    async fn mark_processing(&self, id: Uuid) -> Result<(), AppError>;

    async fn complete(&self, id: Uuid, result: Value) -> Result<(), AppError>;

    async fn fail(&self, id: Uuid, error: String) -> Result<(), AppError>;
}
