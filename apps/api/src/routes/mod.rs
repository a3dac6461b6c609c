pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

/// Headroom for multipart framing on top of the document size cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/resume",
            put(handlers::handle_upload_resume).delete(handlers::handle_clear_resume),
        )
        .route("/api/v1/jobs", post(handlers::handle_add_job))
        .route(
            "/api/v1/jobs/:id",
            put(handlers::handle_update_job).delete(handlers::handle_remove_job),
        )
        .route(
            "/api/v1/batch",
            post(handlers::handle_start_batch).delete(handlers::handle_reset_batch),
        )
        .route("/api/v1/batch/selection", put(handlers::handle_select_job))
        .route(
            "/api/v1/batch/results/:id/export/:document",
            get(handlers::handle_export),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
