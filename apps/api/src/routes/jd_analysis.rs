use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::jd::JdAnalysisRow;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/jd", get(list_analyses).post(create_analysis))
        .route("/api/jd/:id", get(get_analysis).delete(delete_analysis))
}

#[derive(Deserialize)]
pub struct CreateAnalysis {
    pub jd_text: String,
    pub job_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// POST /api/jd
/// Stores a job-description record, optionally linked to a tracked job.
pub async fn create_analysis(
    State(state): State<AppState>,
    Json(req): Json<CreateAnalysis>,
) -> Result<(StatusCode, Json<JdAnalysisRow>), AppError> {
    if req.jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "jd_text must not be empty".to_string(),
        ));
    }

    if let Some(job_id) = req.job_id {
        let job_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM jobs WHERE id = ?")
            .bind(job_id)
            .fetch_optional(&state.db)
            .await?;
        if job_exists.is_none() {
            return Err(AppError::Validation(format!("Job {job_id} does not exist")));
        }
    }

    let row = JdAnalysisRow {
        id: Uuid::new_v4(),
        job_id: req.job_id,
        jd_text: req.jd_text,
        notes: req.notes,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO jd_analyses (id, job_id, jd_text, notes, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(row.job_id)
    .bind(&row.jd_text)
    .bind(&row.notes)
    .bind(row.created_at)
    .execute(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/jd
pub async fn list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<JdAnalysisRow>>, AppError> {
    let rows: Vec<JdAnalysisRow> =
        sqlx::query_as("SELECT * FROM jd_analyses ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}

/// GET /api/jd/:id
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JdAnalysisRow>, AppError> {
    let row: Option<JdAnalysisRow> = sqlx::query_as("SELECT * FROM jd_analyses WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    row.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}

/// DELETE /api/jd/:id
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM jd_analyses WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Analysis {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
