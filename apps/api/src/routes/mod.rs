pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::builder::handlers as builder;
use crate::errors::AppError;
use crate::ingestion::handlers as ingestion;
use crate::optimizer::handlers as optimizer;
use crate::state::AppState;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template catalog (public, read-only)
        .route("/api/v1/templates", get(builder::handle_list_templates))
        // Resume ingestion
        .route(
            "/api/v1/resumes",
            post(ingestion::handle_upload_batch).get(ingestion::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/uploads",
            get(ingestion::handle_upload_progress),
        )
        .route("/api/v1/resumes/:id", delete(ingestion::handle_delete_resume))
        // Portfolio assembly
        .route(
            "/api/v1/portfolios",
            post(builder::handle_create_portfolio).get(builder::handle_list_portfolios),
        )
        // Resume optimization
        .route(
            "/api/v1/optimizations",
            post(optimizer::handle_optimize).get(optimizer::handle_list_optimizations),
        )
        .route(
            "/api/v1/optimizations/:id/export",
            get(optimizer::handle_export),
        )
        // Admin surfaces that exist in navigation but are not built yet
        .route("/api/v1/content-editor", get(not_implemented))
        .route("/api/v1/domain-settings", get(not_implemented))
        .route("/api/v1/analytics", get(not_implemented))
        // A batch of resume files can exceed axum's 2MB default body cap.
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .with_state(state)
}
