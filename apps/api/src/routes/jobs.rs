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
use crate::models::job::JobRow;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route(
            "/api/jobs/:id",
            get(get_job).put(update_job).delete(delete_job),
        )
}

#[derive(Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Partial update: only provided fields change.
#[derive(Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.company.trim().is_empty() {
        return Err(AppError::Validation(
            "company must not be empty".to_string(),
        ));
    }

    let row = JobRow {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        company: req.company.trim().to_string(),
        location: req.location,
        url: req.url,
        description: req.description,
        status: req.status.unwrap_or_else(|| "saved".to_string()),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO jobs (id, title, company, location, url, description, status, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(&row.title)
    .bind(&row.company)
    .bind(&row.location)
    .bind(&row.url)
    .bind(&row.description)
    .bind(&row.status)
    .bind(row.created_at)
    .execute(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/jobs
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    let rows: Vec<JobRow> = sqlx::query_as("SELECT * FROM jobs ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows))
}

/// GET /api/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let row = fetch_job(&state, id).await?;
    Ok(Json(row))
}

/// PUT /api/jobs/:id
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJob>,
) -> Result<Json<JobRow>, AppError> {
    let mut row = fetch_job(&state, id).await?;

    if let Some(title) = req.title {
        row.title = title;
    }
    if let Some(company) = req.company {
        row.company = company;
    }
    if let Some(location) = req.location {
        row.location = Some(location);
    }
    if let Some(url) = req.url {
        row.url = Some(url);
    }
    if let Some(description) = req.description {
        row.description = Some(description);
    }
    if let Some(status) = req.status {
        row.status = status;
    }

    sqlx::query(
        "UPDATE jobs SET title = ?, company = ?, location = ?, url = ?, description = ?, status = ?
         WHERE id = ?",
    )
    .bind(&row.title)
    .bind(&row.company)
    .bind(&row.location)
    .bind(&row.url)
    .bind(&row.description)
    .bind(&row.status)
    .bind(id)
    .execute(&state.db)
    .await?;

    Ok(Json(row))
}

/// DELETE /api/jobs/:id
/// Applications for the job are removed as well (ON DELETE CASCADE).
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_job(state: &AppState, id: Uuid) -> Result<JobRow, AppError> {
    let row: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testing::{send_json, test_app};

    #[tokio::test]
    async fn test_create_and_get_job() {
        let (app, _dir) = test_app().await;

        let (status, created) = send_json(
            &app,
            "POST",
            "/api/jobs",
            Some(json!({"title": "Backend Engineer", "company": "Acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "saved");

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send_json(&app, "GET", &format!("/api/jobs/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Backend Engineer");
        assert_eq!(fetched["company"], "Acme");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let (app, _dir) = test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/jobs",
            Some(json!({"title": "   ", "company": "Acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let (app, _dir) = test_app().await;

        let (_, created) = send_json(
            &app,
            "POST",
            "/api/jobs",
            Some(json!({"title": "Engineer", "company": "Acme", "location": "Berlin"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, updated) = send_json(
            &app,
            "PUT",
            &format!("/api/jobs/{id}"),
            Some(json!({"status": "interviewing"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "interviewing");
        assert_eq!(updated["location"], "Berlin");
        assert_eq!(updated["title"], "Engineer");
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let (app, _dir) = test_app().await;

        for title in ["first", "second"] {
            send_json(
                &app,
                "POST",
                "/api/jobs",
                Some(json!({"title": title, "company": "Acme"})),
            )
            .await;
        }

        let (status, listed) = send_json(&app, "GET", "/api/jobs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_job_is_404() {
        let (app, _dir) = test_app().await;

        let (status, _) = send_json(
            &app,
            "DELETE",
            &format!("/api/jobs/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
