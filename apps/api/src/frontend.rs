//! Catch-all handler serving the prebuilt single-page frontend.
//!
//! Any path the API routers do not claim lands here: known files under the
//! static root are served directly, everything else falls back to
//! `index.html` so client-side routing works. Without a frontend build the
//! handler degrades to a 404 carrying the build instruction.

use std::path::Path;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

const BUILD_HINT: &str = "Frontend not built. Run: cd frontend && npm run build";

pub async fn serve_frontend(State(state): State<AppState>, uri: Uri) -> Response {
    serve_from(&state.config.static_dir, uri.path()).await
}

async fn serve_from(static_dir: &Path, request_path: &str) -> Response {
    let relative = request_path.trim_start_matches('/');

    // Never resolve above the static root.
    if relative.split('/').any(|segment| segment == "..") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    if !relative.is_empty() {
        let candidate = static_dir.join(relative);
        if is_file(&candidate).await {
            return file_response(&candidate).await;
        }
    }

    let index = static_dir.join("index.html");
    if is_file(&index).await {
        return file_response(&index).await;
    }

    (StatusCode::NOT_FOUND, BUILD_HINT).into_response()
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn file_response(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(path))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to read static asset {}: {e}", path.display());
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read static asset").into_response()
        }
    }
}

/// Content type from the file extension. Covers what a Vite/webpack build
/// emits; anything unrecognized is served as raw bytes.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
