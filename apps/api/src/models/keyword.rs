use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked keyword. Terms are unique; `weight` ranks relative importance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeywordRow {
    pub id: Uuid,
    pub term: String,
    pub category: Option<String>,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}
