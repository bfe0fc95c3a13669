use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::filter::SavedFilterRow;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/filters", get(list_filters).post(create_filter))
        .route("/api/filters/:id", delete(delete_filter))
}

#[derive(Deserialize)]
pub struct CreateFilter {
    pub name: String,
    pub criteria: Value,
}

/// POST /api/filters
pub async fn create_filter(
    State(state): State<AppState>,
    Json(req): Json<CreateFilter>,
) -> Result<(StatusCode, Json<SavedFilterRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let row = SavedFilterRow {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        criteria: req.criteria,
        created_at: Utc::now(),
    };

    sqlx::query("INSERT INTO saved_filters (id, name, criteria, created_at) VALUES (?, ?, ?, ?)")
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.criteria)
        .bind(row.created_at)
        .execute(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/filters
pub async fn list_filters(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedFilterRow>>, AppError> {
    let rows: Vec<SavedFilterRow> =
        sqlx::query_as("SELECT * FROM saved_filters ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}

/// DELETE /api/filters/:id
pub async fn delete_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM saved_filters WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Filter {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
