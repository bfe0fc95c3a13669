use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::routes::build_router;
use crate::state::AppState;

/// Builds a fully configured application instance.
///
/// Each call returns a fresh, independently owned router: upload directory
/// ensured, database opened and schema created, the seven feature groups
/// mounted, and the frontend fallback registered. Any failure here is fatal
/// to startup; there is nothing to retry before the first request.
pub async fn build_app(config: Config) -> Result<Router> {
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Cannot create upload directory {}",
                config.upload_dir.display()
            )
        })?;

    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(&pool).await?;

    if !config.static_dir.is_dir() {
        info!(
            "No frontend build at {}; non-API routes will return a build hint",
            config.static_dir.display()
        );
    }

    let max_upload_bytes = config.max_upload_bytes;
    let state = AppState { db: pool, config };

    // CORS is deliberately accept-all; the API has no cross-origin secrets
    // and the dev frontend runs on a different port.
    Ok(build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(max_upload_bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_config(base: &std::path::Path, max_upload_bytes: usize) -> Config {
        Config {
            database_url: format!("sqlite://{}", base.join("database.db").display()),
            upload_dir: base.join("uploads"),
            static_dir: base.join("frontend").join("dist"),
            max_upload_bytes,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_factory_creates_upload_dir() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), 1024);

        build_app(config.clone()).await.unwrap();
        assert!(config.upload_dir.is_dir());
    }

    #[tokio::test]
    async fn test_factory_is_idempotent_against_same_database() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), 1024);

        build_app(config.clone()).await.unwrap();
        // Second construction must not trip over existing tables.
        build_app(config).await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_before_handlers() {
        let dir = TempDir::new().unwrap();
        let app = build_app(test_config(dir.path(), 64)).await.unwrap();

        let big = format!(
            "{{\"title\": \"{}\", \"company\": \"Acme\"}}",
            "x".repeat(256)
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/jobs")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(big))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
