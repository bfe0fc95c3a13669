use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored job-description record, optionally linked to a tracked job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JdAnalysisRow {
    pub id: Uuid,
    pub job_id: Option<Uuid>,
    pub jd_text: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
