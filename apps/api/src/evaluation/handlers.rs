//! Axum route handlers for the Conversation Analysis API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::cleanup::cleanup_transcript;
use crate::evaluation::engine::{process_job, run_evaluation};
use crate::jobs::{JobRecord, JobStatus};
use crate::models::evaluation::EvaluationRow;
use crate::rubric::resolve_rubric;
use crate::state::AppState;

/// Upper bound on accepted transcripts, in characters.
pub const MAX_TRANSCRIPT_CHARS: usize = 100_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub transcript: String,
    /// Defaults to the default rubric when omitted.
    pub rubric_id: Option<Uuid>,
    /// When true, returns a job id immediately and evaluates on the runtime.
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeAccepted {
    pub job_id: Uuid,
    pub status: JobStatus,
}

#[derive(Debug, Deserialize)]
pub struct JobStatusRequest {
    pub job_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub cleaned_transcript: String,
    pub provider: String,
}

fn validate_transcript(transcript: &str) -> Result<(), AppError> {
    if transcript.trim().is_empty() {
        return Err(AppError::Validation("transcript cannot be empty".to_string()));
    }
    let chars = transcript.chars().count();
    if chars > MAX_TRANSCRIPT_CHARS {
        return Err(AppError::Validation(format!(
            "transcript is too long: {chars} characters (limit {MAX_TRANSCRIPT_CHARS})"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-conversation
///
/// Synchronous by default: evaluates inline and returns the stored
/// evaluation. With `background: true`, creates a job and returns 202 with
/// its id; the client polls /api/check-job-status.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    validate_transcript(&request.transcript)?;

    let rubric = resolve_rubric(&state.db, request.rubric_id).await?;

    if request.background {
        let job = state.jobs.create().await?;
        let job_id = job.id;
        let task_state = state.clone();
        let transcript = request.transcript;
        tokio::spawn(async move {
            process_job(task_state, job_id, rubric, transcript).await;
        });
        let accepted = AnalyzeAccepted {
            job_id,
            status: job.status,
        };
        return Ok((StatusCode::ACCEPTED, Json(accepted)).into_response());
    }

    let response =
        run_evaluation(&state.db, state.llm.as_ref(), &rubric, &request.transcript).await?;
    Ok(Json(response).into_response())
}

/// POST /api/check-job-status
///
/// Returns the job record; unknown and expired ids are a 404.
pub async fn handle_check_job_status(
    State(state): State<AppState>,
    Json(request): Json<JobStatusRequest>,
) -> Result<Json<JobRecord>, AppError> {
    let record = state
        .jobs
        .get(request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found or expired", request.job_id)))?;
    Ok(Json(record))
}

/// POST /api/cleanup-conversation
pub async fn handle_cleanup(
    State(state): State<AppState>,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<CleanupResponse>, AppError> {
    validate_transcript(&request.transcript)?;

    let outcome = cleanup_transcript(state.llm.as_ref(), &request.transcript).await;
    Ok(Json(CleanupResponse {
        cleaned_transcript: outcome.cleaned_transcript,
        provider: outcome.provider,
    }))
}

/// GET /api/evaluations
pub async fn handle_list_evaluations(
    State(state): State<AppState>,
) -> Result<Json<Vec<EvaluationRow>>, AppError> {
    let rows = sqlx::query_as::<_, EvaluationRow>(
        "SELECT * FROM evaluations ORDER BY created_at DESC LIMIT 50",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/evaluations/:id
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EvaluationRow>, AppError> {
    let row = sqlx::query_as::<_, EvaluationRow>("SELECT * FROM evaluations WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))?;
    Ok(Json(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_request_background_defaults_false() {
        let request: AnalyzeRequest = serde_json::from_value(json!({
            "transcript": "Host: Welcome!"
        }))
        .unwrap();
        assert!(!request.background);
        assert!(request.rubric_id.is_none());
    }

    #[test]
    fn test_validate_rejects_blank_transcript() {
        let err = validate_transcript("   \n ").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_transcript() {
        let big = "a".repeat(MAX_TRANSCRIPT_CHARS + 1);
        let err = validate_transcript(&big).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_accepts_normal_transcript() {
        assert!(validate_transcript("Host: Welcome to the tasting room!").is_ok());
    }

    #[test]
    fn test_validate_accepts_exactly_at_limit() {
        let exact = "a".repeat(MAX_TRANSCRIPT_CHARS);
        assert!(validate_transcript(&exact).is_ok());
    }
}
