use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::keyword::KeywordRow;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/keywords", get(list_keywords).post(create_keyword))
        .route("/api/keywords/:id", delete(delete_keyword))
}

#[derive(Deserialize)]
pub struct CreateKeyword {
    pub term: String,
    pub category: Option<String>,
    pub weight: Option<f64>,
}

/// POST /api/keywords
pub async fn create_keyword(
    State(state): State<AppState>,
    Json(req): Json<CreateKeyword>,
) -> Result<(StatusCode, Json<KeywordRow>), AppError> {
    let term = req.term.trim().to_lowercase();
    if term.is_empty() {
        return Err(AppError::Validation("term must not be empty".to_string()));
    }

    let row = KeywordRow {
        id: Uuid::new_v4(),
        term,
        category: req.category,
        weight: req.weight.unwrap_or(1.0),
        created_at: Utc::now(),
    };

    // Uniqueness is enforced by the table constraint, so concurrent creates
    // of the same term cannot both slip through a pre-check.
    let result = sqlx::query(
        "INSERT INTO keywords (id, term, category, weight, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(&row.term)
    .bind(&row.category)
    .bind(row.weight)
    .bind(row.created_at)
    .execute(&state.db)
    .await;

    if let Err(e) = result {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            return Err(AppError::Conflict(format!(
                "Keyword '{}' already exists",
                row.term
            )));
        }
        return Err(e.into());
    }

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/keywords
pub async fn list_keywords(
    State(state): State<AppState>,
) -> Result<Json<Vec<KeywordRow>>, AppError> {
    let rows: Vec<KeywordRow> =
        sqlx::query_as("SELECT * FROM keywords ORDER BY weight DESC, term ASC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}

/// DELETE /api/keywords/:id
pub async fn delete_keyword(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM keywords WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Keyword {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
