//! File-backed job store: one JSON file per job under a scratch directory,
//! read and overwritten sequentially. Single writer per job; no locking.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::jobs::{JobRecord, JobStatus, JobStore};

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_SUBDIR: &str = "veraison-jobs";

pub struct FileJobStore {
    dir: PathBuf,
    ttl: Duration,
}

impl FileJobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let dir = config
            .job_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_SUBDIR));
        Self::new(dir)
    }

    #[cfg(test)]
    fn with_ttl(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn is_expired(&self, record: &JobRecord) -> bool {
        let age = Utc::now().signed_duration_since(record.created_at);
        age.to_std().map(|age| age > self.ttl).unwrap_or(false)
    }

    async fn write_record(&self, record: &JobRecord) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| AppError::Jobs(format!("Failed to encode job {}: {e}", record.id)))?;
        tokio::fs::write(self.path_for(record.id), bytes)
            .await
            .map_err(|e| AppError::Jobs(format!("Failed to write job {}: {e}", record.id)))
    }

    async fn read_record(&self, id: Uuid) -> Result<Option<JobRecord>, AppError> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Jobs(format!("Failed to read job {id}: {e}"))),
        };
        let record: JobRecord = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Jobs(format!("Corrupt job file for {id}: {e}")))?;

        if self.is_expired(&record) {
            debug!("Job {id} expired; removing its record");
            remove_best_effort(&path).await;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut record = self
            .read_record(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
        apply(&mut record);
        record.updated_at = Utc::now();
        self.write_record(&record).await
    }
}

async fn remove_best_effort(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove expired job file {}: {e}", path.display());
        }
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn create(&self) -> Result<JobRecord, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Jobs(format!("Failed to create job dir: {e}")))?;
        let record = JobRecord::new();
        self.write_record(&record).await?;
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobRecord>, AppError> {
        self.read_record(id).await
    }

    async fn mark_processing(&self, id: Uuid) -> Result<(), AppError> {
        self.update(id, |record| record.status = JobStatus::Processing)
            .await
    }

    async fn complete(&self, id: Uuid, result: Value) -> Result<(), AppError> {
        self.update(id, |record| {
            record.status = JobStatus::Completed;
            record.result = Some(result);
            record.error = None;
        })
        .await
    }

    async fn fail(&self, id: Uuid, error: String) -> Result<(), AppError> {
        self.update(id, |record| {
            record.status = JobStatus::Failed;
            record.error = Some(error);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(dir: &tempfile::TempDir) -> FileJobStore {
        FileJobStore::new(dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let created = store.create().await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let job = store.create().await.unwrap();
        store.mark_processing(job.id).await.unwrap();
        assert_eq!(
            store.get(job.id).await.unwrap().unwrap().status,
            JobStatus::Processing
        );

        store.complete(job.id, json!({"overall_percent": 82})).await.unwrap();
        let done = store.get(job.id).await.unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.result.unwrap()["overall_percent"], 82);
        assert!(done.error.is_none());
    }

    #[tokio::test]
    async fn test_fail_records_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let job = store.create().await.unwrap();
        store.fail(job.id, "rubric vanished".to_string()).await.unwrap();

        let failed = store.get(job.id).await.unwrap().unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("rubric vanished"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let err = store.mark_processing(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_expired_job_is_gone_and_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::with_ttl(dir.path().to_path_buf(), Duration::from_secs(0));

        let job = store.create().await.unwrap();
        // TTL of zero: any age is past it.
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(store.get(job.id).await.unwrap().is_none());
        assert!(!dir.path().join(format!("{}.json", job.id)).exists());
    }

    #[tokio::test]
    async fn test_overwrite_is_sequential_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let job = store.create().await.unwrap();
        store.mark_processing(job.id).await.unwrap();
        store.complete(job.id, json!({"ok": true})).await.unwrap();

        let record = store.get(job.id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Completed);
    }
}
