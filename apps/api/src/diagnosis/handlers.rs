//! Axum route handlers for the Diagnosis API.

use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::diagnosis::flow::diagnose;
use crate::diagnosis::models::{
    confidence_percent, ConfidenceBand, DiagnosisRequest, DiagnosisResult,
};
use crate::errors::AppError;
use crate::media::DataUri;
use crate::state::AppState;

/// A diagnosis plus the confidence figures the result card displays.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResponse {
    #[serde(flatten)]
    pub result: DiagnosisResult,
    pub confidence_percent: u8,
    pub confidence_band: ConfidenceBand,
}

impl From<DiagnosisResult> for DiagnosisResponse {
    fn from(result: DiagnosisResult) -> Self {
        let confidence_percent = confidence_percent(result.confidence_level());
        Self {
            confidence_band: ConfidenceBand::from_percent(confidence_percent),
            confidence_percent,
            result,
        }
    }
}

/// POST /api/v1/diagnose
///
/// JSON body with the photo already encoded as a data URI.
pub async fn handle_diagnose(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    run_diagnosis(&state, request).await
}

/// POST /api/v1/diagnose/upload
///
/// Multipart form: `cropType`, `photo` (file), optional `symptoms`.
/// The photo is encoded as a data URI here and then takes the same path as the JSON route.
pub async fn handle_diagnose_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let mut request = DiagnosisRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("cropType") => {
                request.crop_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?,
                );
            }
            Some("symptoms") => {
                request.symptoms = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?,
                );
            }
            Some("photo") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                let photo = DataUri::from_bytes(&content_type, &bytes)?;
                request.photo_data_uri = Some(photo.to_uri());
            }
            _ => {}
        }
    }

    run_diagnosis(&state, request).await
}

async fn run_diagnosis(
    state: &AppState,
    request: DiagnosisRequest,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let result = diagnose(state.model.as_ref(), request)
        .instrument(info_span!("diagnose", %request_id))
        .await?;

    Ok(Json(DiagnosisResponse::from(result)))
}
