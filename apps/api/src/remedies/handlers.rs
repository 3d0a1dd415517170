//! Axum route handlers for the Remedy API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::remedies::flow::suggest_remedies;
use crate::remedies::models::{RemedyRequest, RemedyResult};
use crate::state::AppState;

/// POST /api/v1/remedies
pub async fn handle_suggest_remedies(
    State(state): State<AppState>,
    payload: Result<Json<RemedyRequest>, JsonRejection>,
) -> Result<Json<RemedyResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let request_id = Uuid::new_v4();
    let result = suggest_remedies(state.model.as_ref(), request)
        .instrument(info_span!("suggest_remedies", %request_id))
        .await?;

    Ok(Json(result))
}
