use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A rubric as stored: criteria and bands live in JSONB columns and are
/// decoded into typed structs at the domain boundary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RubricRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub criteria: Value,
    pub bands: Value,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
