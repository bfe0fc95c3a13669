use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/api/applications/:id",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
}

#[derive(Deserialize)]
pub struct CreateApplication {
    pub job_id: Uuid,
    pub status: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateApplication {
    pub status: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

/// POST /api/applications
pub async fn create_application(
    State(state): State<AppState>,
    Json(req): Json<CreateApplication>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let job_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM jobs WHERE id = ?")
        .bind(req.job_id)
        .fetch_optional(&state.db)
        .await?;
    if job_exists.is_none() {
        return Err(AppError::Validation(format!(
            "Job {} does not exist",
            req.job_id
        )));
    }

    let row = ApplicationRow {
        id: Uuid::new_v4(),
        job_id: req.job_id,
        status: req.status.unwrap_or_else(|| "applied".to_string()),
        applied_at: req.applied_at,
        notes: req.notes,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO applications (id, job_id, status, applied_at, notes, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(row.job_id)
    .bind(&row.status)
    .bind(row.applied_at)
    .bind(&row.notes)
    .bind(row.created_at)
    .execute(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/applications?status=applied
pub async fn list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let rows: Vec<ApplicationRow> = match params.status {
        Some(status) => {
            sqlx::query_as(
                "SELECT * FROM applications WHERE status = ? ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM applications ORDER BY created_at DESC")
                .fetch_all(&state.db)
                .await?
        }
    };
    Ok(Json(rows))
}

/// GET /api/applications/:id
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let row = fetch_application(&state, id).await?;
    Ok(Json(row))
}

/// PUT /api/applications/:id
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplication>,
) -> Result<Json<ApplicationRow>, AppError> {
    let mut row = fetch_application(&state, id).await?;

    if let Some(status) = req.status {
        row.status = status;
    }
    if let Some(applied_at) = req.applied_at {
        row.applied_at = Some(applied_at);
    }
    if let Some(notes) = req.notes {
        row.notes = Some(notes);
    }

    sqlx::query("UPDATE applications SET status = ?, applied_at = ?, notes = ? WHERE id = ?")
        .bind(&row.status)
        .bind(row.applied_at)
        .bind(&row.notes)
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(Json(row))
}

/// DELETE /api/applications/:id
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM applications WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_application(state: &AppState, id: Uuid) -> Result<ApplicationRow, AppError> {
    let row: Option<ApplicationRow> = sqlx::query_as("SELECT * FROM applications WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testing::{send_json, test_app};

    async fn create_job(app: &axum::Router) -> String {
        let (_, job) = send_json(
            app,
            "POST",
            "/api/jobs",
            Some(json!({"title": "Engineer", "company": "Acme"})),
        )
        .await;
        job["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_requires_existing_job() {
        let (app, _dir) = test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/applications",
            Some(json!({"job_id": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_defaults_status_to_applied() {
        let (app, _dir) = test_app().await;
        let job_id = create_job(&app).await;

        let (status, created) = send_json(
            &app,
            "POST",
            "/api/applications",
            Some(json!({"job_id": job_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "applied");
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (app, _dir) = test_app().await;
        let job_id = create_job(&app).await;

        for status in ["applied", "rejected", "applied"] {
            send_json(
                &app,
                "POST",
                "/api/applications",
                Some(json!({"job_id": job_id, "status": status})),
            )
            .await;
        }

        let (_, all) = send_json(&app, "GET", "/api/applications", None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, applied) = send_json(&app, "GET", "/api/applications?status=applied", None).await;
        assert_eq!(applied.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_and_notes() {
        let (app, _dir) = test_app().await;
        let job_id = create_job(&app).await;

        let (_, created) = send_json(
            &app,
            "POST",
            "/api/applications",
            Some(json!({"job_id": job_id})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, updated) = send_json(
            &app,
            "PUT",
            &format!("/api/applications/{id}"),
            Some(json!({"status": "offer", "notes": "negotiating"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "offer");
        assert_eq!(updated["notes"], "negotiating");
    }

    #[tokio::test]
    async fn test_deleting_job_cascades_to_applications() {
        let (app, _dir) = test_app().await;
        let job_id = create_job(&app).await;

        send_json(
            &app,
            "POST",
            "/api/applications",
            Some(json!({"job_id": job_id})),
        )
        .await;
        send_json(&app, "DELETE", &format!("/api/jobs/{job_id}"), None).await;

        let (_, remaining) = send_json(&app, "GET", "/api/applications", None).await;
        assert!(remaining.as_array().unwrap().is_empty());
    }
}
