pub mod analytics;
pub mod applications;
pub mod filters;
pub mod health;
pub mod jd_analysis;
pub mod jobs;
pub mod keywords;
pub mod resumes;

use axum::{routing::get, Router};

use crate::frontend;
use crate::state::AppState;

/// Assembles the complete application router. The seven feature groups are
/// mounted in a fixed, declared order; each group owns its URL prefix.
/// Everything the groups do not claim falls through to the frontend handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .merge(resumes::router())
        .merge(keywords::router())
        .merge(jobs::router())
        .merge(applications::router())
        .merge(analytics::router())
        .merge(filters::router())
        .merge(jd_analysis::router())
        .fallback(frontend::serve_frontend)
        .with_state(state)
}
