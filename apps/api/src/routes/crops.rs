use axum::Json;
use serde::Serialize;

use crate::models::crop::CropType;

#[derive(Debug, Serialize)]
pub struct CropListResponse {
    pub crops: Vec<CropType>,
}

/// GET /api/v1/crops
pub async fn handle_list_crops() -> Json<CropListResponse> {
    Json(CropListResponse {
        crops: CropType::ALL.to_vec(),
    })
}
