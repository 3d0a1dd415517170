pub mod crops;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::diagnosis::handlers as diagnosis;
use crate::remedies::handlers as remedies;
use crate::state::AppState;

/// A 5 MiB photo grows by 4/3 once base64-encoded; leave room for the other fields.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/crops", get(crops::handle_list_crops))
        .route("/api/v1/diagnose", post(diagnosis::handle_diagnose))
        .route(
            "/api/v1/diagnose/upload",
            post(diagnosis::handle_diagnose_upload),
        )
        .route("/api/v1/remedies", post(remedies::handle_suggest_remedies))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
