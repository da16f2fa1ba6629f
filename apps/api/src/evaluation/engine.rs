//! Evaluation engine — orchestrates the full analysis pipeline.
//!
//! Flow: build prompt → LLM call → repair → weighted scoring → band lookup →
//!       persist → respond. A provider failure downgrades to the keyword
//!       fallback evaluator instead of failing the request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::fallback::{fallback_evaluation, FALLBACK_PROVIDER};
use crate::evaluation::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use crate::evaluation::repair::coerce_evaluation;
use crate::evaluation::scoring::{band_for, overall_percent};
use crate::evaluation::EvaluationData;
use crate::llm_client::LlmProvider;
use crate::rubric::Rubric;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub rubric_id: Uuid,
    pub overall_percent: u32,
    pub band_label: String,
    pub provider: String,
    pub repaired: bool,
    pub data: EvaluationData,
    pub created_at: DateTime<Utc>,
}

/// Evaluates a transcript against a rubric and persists the result.
pub async fn run_evaluation(
    pool: &PgPool,
    llm: &dyn LlmProvider,
    rubric: &Rubric,
    transcript: &str,
) -> Result<EvaluationResponse, AppError> {
    let prompt = build_evaluation_prompt(transcript, rubric);

    let (data, provider, repaired) = match llm.complete(&prompt, EVALUATION_SYSTEM).await {
        Ok(text) => {
            let outcome = coerce_evaluation(&text, &rubric.criteria);
            if outcome.repaired {
                warn!("Evaluation JSON from {} needed repair", llm.name());
            }
            (outcome.data, llm.name().to_string(), outcome.repaired)
        }
        Err(e) => {
            warn!("LLM evaluation failed ({e}); using keyword fallback evaluator");
            (
                fallback_evaluation(transcript, &rubric.criteria),
                FALLBACK_PROVIDER.to_string(),
                false,
            )
        }
    };

    let percent = overall_percent(&data, &rubric.criteria);
    let band_label = band_for(&rubric.bands, percent)
        .map(|b| b.label.clone())
        .unwrap_or_else(|| "Unclassified".to_string());

    let id = Uuid::new_v4();
    let created_at = Utc::now();
    let data_json = serde_json::to_value(&data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize evaluation: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO evaluations
            (id, rubric_id, transcript, data, overall_percent, band_label, provider, repaired, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(rubric.id)
    .bind(transcript)
    .bind(&data_json)
    .bind(percent as i32)
    .bind(&band_label)
    .bind(&provider)
    .bind(repaired)
    .bind(created_at)
    .execute(pool)
    .await?;

    info!("Evaluation {id} stored: {percent}% ({band_label}) via {provider}");

    Ok(EvaluationResponse {
        id,
        rubric_id: rubric.id,
        overall_percent: percent,
        band_label,
        provider,
        repaired,
        data,
        created_at,
    })
}

/// Runs a background analysis job, moving the record pending → processing →
/// completed | failed. Never returns an error; failures land on the job.
pub async fn process_job(state: AppState, job_id: Uuid, rubric: Rubric, transcript: String) {
    if let Err(e) = state.jobs.mark_processing(job_id).await {
        error!("Job {job_id}: could not mark processing: {e}");
        return;
    }

    match run_evaluation(&state.db, state.llm.as_ref(), &rubric, &transcript).await {
        Ok(response) => {
            let payload = match serde_json::to_value(&response) {
                Ok(v) => v,
                Err(e) => {
                    fail_job(&state, job_id, format!("Failed to encode result: {e}")).await;
                    return;
                }
            };
            if let Err(e) = state.jobs.complete(job_id, payload).await {
                error!("Job {job_id}: could not record completion: {e}");
            }
        }
        Err(e) => fail_job(&state, job_id, e.to_string()).await,
    }
}

async fn fail_job(state: &AppState, job_id: Uuid, message: String) {
    if let Err(e) = state.jobs.fail(job_id, message).await {
        error!("Job {job_id}: could not record failure: {e}");
    }
}

/// Renders the rubric into the evaluation prompt template: each criterion
/// with its weight and five level descriptions, then the transcript.
fn build_evaluation_prompt(transcript: &str, rubric: &Rubric) -> String {
    let mut criteria_block = String::new();
    for (i, criterion) in rubric.criteria.iter().enumerate() {
        criteria_block.push_str(&format!(
            "{}. {} (weight {}%): {}\n",
            i + 1,
            criterion.name,
            criterion.weight,
            criterion.description
        ));
        for (level, description) in criterion.scoring_descriptions.iter().enumerate() {
            criteria_block.push_str(&format!("   {}: {}\n", level + 1, description));
        }
    }

    EVALUATION_PROMPT_TEMPLATE
        .replace("{criteria_block}", criteria_block.trim_end())
        .replace("{criterion_count}", &rubric.criteria.len().to_string())
        .replace("{transcript}", transcript)
}
