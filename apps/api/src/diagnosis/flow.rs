//! Diagnosis flow: validate request → prompt + image → model → validate result.
//!
//! Stateless and single-shot: no retry, no cache. The first failure is returned.

use tracing::{debug, info};

use crate::diagnosis::models::{diagnosis_output_schema, DiagnosisRequest, DiagnosisResult};
use crate::diagnosis::prompts::build_diagnosis_prompt;
use crate::errors::AppError;
use crate::llm_client::prompts::PLANT_PATHOLOGIST_SYSTEM;
use crate::llm_client::{ModelInvoker, ModelRequest};
use crate::models::crop::CropType;
use crate::validation::ensure_answer;

/// Diagnoses a crop disease from a photo, a crop type and optional symptoms.
///
/// Fails with:
/// - `Validation` before any model call if the crop type or photo is missing or malformed
/// - `ModelInvocation` if the model call errors or times out
/// - `EmptyResult` if the model answers with nothing
/// - `Validation` if the answer does not match the diagnosis schema
pub async fn diagnose(
    model: &dyn ModelInvoker,
    request: DiagnosisRequest,
) -> Result<DiagnosisResult, AppError> {
    let request = request.validate()?;

    if !CropType::is_supported(&request.crop_type) {
        debug!(
            "Crop '{}' is outside the supported set; diagnosing anyway",
            request.crop_type
        );
    }

    let prompt = build_diagnosis_prompt(&request);
    let model_request = ModelRequest {
        system: PLANT_PATHOLOGIST_SYSTEM,
        prompt,
        image: Some(request.image),
        output: diagnosis_output_schema(),
    };

    let raw = model.invoke(&model_request).await?;
    ensure_answer(&raw)?;

    let result: DiagnosisResult = serde_json::from_value(raw).map_err(|e| {
        AppError::Validation(format!(
            "model response does not match the diagnosis schema: {e}"
        ))
    })?;
    result.validate()?;

    info!(
        "Diagnosed {} as '{}' (confidence {:.2}, {} actions)",
        request.crop_type,
        result.disease_name(),
        result.confidence_level(),
        result.recommended_actions.len()
    );

    Ok(result)
}
