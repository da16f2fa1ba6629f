use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationRow {
    pub id: Uuid,
    pub rubric_id: Uuid,
    pub transcript: String,
    /// The repaired `EvaluationData` payload.
    pub data: Value,
    pub overall_percent: i32,
    pub band_label: String,
    /// Which backend produced the scores: "claude", "gemini", or "fallback".
    pub provider: String,
    /// True when the model's JSON needed defaulting or array repair.
    pub repaired: bool,
    pub created_at: DateTime<Utc>,
}
