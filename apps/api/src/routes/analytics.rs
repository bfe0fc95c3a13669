use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analytics/summary", get(summary))
}

#[derive(Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub total_jobs: i64,
    pub total_applications: i64,
    pub applications_by_status: Vec<StatusCount>,
}

/// GET /api/analytics/summary
/// Plain count aggregates over the tracker tables.
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let total_jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&state.db)
        .await?;

    let total_applications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
        .fetch_one(&state.db)
        .await?;

    let by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM applications GROUP BY status ORDER BY COUNT(*) DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(SummaryResponse {
        total_jobs,
        total_applications,
        applications_by_status: by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
    }))
}
