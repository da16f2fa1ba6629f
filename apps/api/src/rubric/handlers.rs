//! Axum route handlers for the Rubric CRUD API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rubric::RubricRow;
use crate::rubric::validation::validate_rubric;
use crate::rubric::{Criterion, PerformanceBand, Rubric};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RubricInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: Vec<Criterion>,
    pub bands: Vec<PerformanceBand>,
}

impl RubricInput {
    fn validated(&self) -> Result<(), AppError> {
        let problems = validate_rubric(&self.name, &self.criteria, &self.bands);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join("; ")))
        }
    }

    fn criteria_json(&self) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(&self.criteria)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize criteria: {e}")))
    }

    fn bands_json(&self) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(&self.bands)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize bands: {e}")))
    }
}

/// GET /api/rubrics
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Rubric>>, AppError> {
    let rows = sqlx::query_as::<_, RubricRow>(
        "SELECT * FROM rubrics ORDER BY is_default DESC, name ASC",
    )
    .fetch_all(&state.db)
    .await?;

    let rubrics = rows
        .into_iter()
        .map(Rubric::from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(rubrics))
}

/// POST /api/rubrics
pub async fn handle_create(
    State(state): State<AppState>,
    Json(input): Json<RubricInput>,
) -> Result<(StatusCode, Json<Rubric>), AppError> {
    input.validated()?;

    let row = sqlx::query_as::<_, RubricRow>(
        r#"
        INSERT INTO rubrics (id, name, description, criteria, bands, is_default, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.criteria_json()?)
    .bind(input.bands_json()?)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(Rubric::from_row(row)?)))
}

/// GET /api/rubrics/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Rubric>, AppError> {
    let rubric = crate::rubric::fetch_rubric(&state.db, id).await?;
    Ok(Json(rubric))
}

/// PUT /api/rubrics/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RubricInput>,
) -> Result<Json<Rubric>, AppError> {
    input.validated()?;

    let row = sqlx::query_as::<_, RubricRow>(
        r#"
        UPDATE rubrics
        SET name = $2, description = $3, criteria = $4, bands = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.criteria_json()?)
    .bind(input.bands_json()?)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Rubric {id} not found")))?;

    Ok(Json(Rubric::from_row(row)?))
}

/// DELETE /api/rubrics/:id
///
/// The default rubric cannot be deleted; promote another rubric first.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let is_default: Option<bool> =
        sqlx::query_scalar("SELECT is_default FROM rubrics WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;

    match is_default {
        None => return Err(AppError::NotFound(format!("Rubric {id} not found"))),
        Some(true) => {
            return Err(AppError::Conflict(
                "The default rubric cannot be deleted; set another rubric as default first"
                    .to_string(),
            ))
        }
        Some(false) => {}
    }

    sqlx::query("DELETE FROM rubrics WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/rubrics/:id/set-default
///
/// Clears the flag on all rubrics and sets it on the target, atomically.
pub async fn handle_set_default(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;

    sqlx::query("UPDATE rubrics SET is_default = FALSE, updated_at = NOW() WHERE is_default")
        .execute(&mut *tx)
        .await?;

    let updated = sqlx::query("UPDATE rubrics SET is_default = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Rubric {id} not found")));
    }

    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
