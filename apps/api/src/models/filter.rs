use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A saved search filter. `criteria` is opaque JSON owned by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedFilterRow {
    pub id: Uuid,
    pub name: String,
    pub criteria: Value,
    pub created_at: DateTime<Utc>,
}
