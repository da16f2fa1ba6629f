//! Rubric domain — configurable scoring templates with weighted criteria and
//! performance bands.

pub mod defaults;
pub mod handlers;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rubric::RubricRow;

/// One weighted scoring dimension of a rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub description: String,
    /// Percent weight. All weights in a rubric sum to 100.
    pub weight: u32,
    /// What a score of 1 through 5 looks like, in order. Always 5 entries.
    pub scoring_descriptions: Vec<String>,
}

/// A labelled percent range. A rubric's bands tile 0–100 exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceBand {
    pub label: String,
    pub min_percent: u32,
    pub max_percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub criteria: Vec<Criterion>,
    pub bands: Vec<PerformanceBand>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rubric {
    /// Decodes the JSONB columns of a stored rubric. A decode failure means
    /// the row was written outside the validated API and is surfaced as an
    /// internal error, not a 404.
    pub fn from_row(row: RubricRow) -> Result<Self, AppError> {
        let criteria: Vec<Criterion> = serde_json::from_value(row.criteria).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Malformed criteria JSON for rubric {}: {e}",
                row.id
            ))
        })?;
        let bands: Vec<PerformanceBand> = serde_json::from_value(row.bands).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Malformed bands JSON for rubric {}: {e}",
                row.id
            ))
        })?;
        Ok(Rubric {
            id: row.id,
            name: row.name,
            description: row.description,
            criteria,
            bands,
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub async fn fetch_rubric(pool: &PgPool, id: Uuid) -> Result<Rubric, AppError> {
    let row = sqlx::query_as::<_, RubricRow>("SELECT * FROM rubrics WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rubric {id} not found")))?;
    Rubric::from_row(row)
}

pub async fn fetch_default_rubric(pool: &PgPool) -> Result<Rubric, AppError> {
    let row = sqlx::query_as::<_, RubricRow>("SELECT * FROM rubrics WHERE is_default LIMIT 1")
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No default rubric is configured".to_string()))?;
    Rubric::from_row(row)
}

/// Resolves the rubric for an analysis request: an explicit id, or the default.
pub async fn resolve_rubric(pool: &PgPool, rubric_id: Option<Uuid>) -> Result<Rubric, AppError> {
    match rubric_id {
        Some(id) => fetch_rubric(pool, id).await,
        None => fetch_default_rubric(pool).await,
    }
}
