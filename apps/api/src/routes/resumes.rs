use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/resumes", get(list_resumes).post(upload_resume))
        .route("/api/resumes/:id", get(get_resume).delete(delete_resume))
        .route("/api/resumes/:id/file", get(download_resume))
}

/// POST /api/resumes
/// Multipart upload. The file lands in the upload directory under a
/// UUID-prefixed name; only metadata goes into the database.
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_else(|| "resume".to_string());
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation(
                "Uploaded file is empty".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let dest = state.config.upload_dir.join(format!("{id}_{filename}"));
        tokio::fs::write(&dest, &data).await?;

        let row = ResumeRow {
            id,
            filename,
            stored_path: dest.display().to_string(),
            content_type,
            size_bytes: data.len() as i64,
            uploaded_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO resumes (id, filename, stored_path, content_type, size_bytes, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(row.id)
        .bind(&row.filename)
        .bind(&row.stored_path)
        .bind(&row.content_type)
        .bind(row.size_bytes)
        .bind(row.uploaded_at)
        .execute(&state.db)
        .await?;

        return Ok((StatusCode::CREATED, Json(row)));
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}

/// GET /api/resumes
pub async fn list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let rows: Vec<ResumeRow> = sqlx::query_as("SELECT * FROM resumes ORDER BY uploaded_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows))
}

/// GET /api/resumes/:id
pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = fetch_resume(&state, id).await?;
    Ok(Json(row))
}

/// GET /api/resumes/:id/file
/// Streams the stored bytes back with the recorded content type.
pub async fn download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = fetch_resume(&state, id).await?;

    let data = tokio::fs::read(&row.stored_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(format!("Stored file for resume {id} is missing"))
        } else {
            AppError::Io(e)
        }
    })?;

    let content_type = row
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}

/// DELETE /api/resumes/:id
/// Removes the stored file too; an already-missing file is not an error.
pub async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let row = fetch_resume(&state, id).await?;

    if let Err(e) = tokio::fs::remove_file(&row.stored_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            return Err(AppError::Io(e));
        }
    }

    sqlx::query("DELETE FROM resumes WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_resume(state: &AppState, id: Uuid) -> Result<ResumeRow, AppError> {
    let row: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Strips any path components from a client-supplied filename.
fn sanitize_filename(raw: &str) -> String {
    let name = std::path::Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("resume");
    name.replace(['/', '\\'], "_")
}
