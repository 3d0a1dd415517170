//! Remedy flow: validate request → text prompt → model → validate result.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::PLANT_PATHOLOGIST_SYSTEM;
use crate::llm_client::{ModelInvoker, ModelRequest};
use crate::remedies::models::{remedy_output_schema, RemedyRequest, RemedyResult};
use crate::remedies::prompts::build_remedy_prompt;
use crate::validation::ensure_answer;

/// Suggests remedies for a named disease on a given crop.
///
/// Same failure modes as `diagnose`; an empty remedy list counts as an empty result.
pub async fn suggest_remedies(
    model: &dyn ModelInvoker,
    request: RemedyRequest,
) -> Result<RemedyResult, AppError> {
    let request = request.validate()?;

    let model_request = ModelRequest {
        system: PLANT_PATHOLOGIST_SYSTEM,
        prompt: build_remedy_prompt(&request)?,
        image: None,
        output: remedy_output_schema(),
    };

    let raw = model.invoke(&model_request).await?;
    ensure_answer(&raw)?;

    let result: RemedyResult = serde_json::from_value(raw).map_err(|e| {
        AppError::Validation(format!(
            "model response does not match the remedy schema: {e}"
        ))
    })?;
    result.validate()?;

    info!(
        "Suggested {} remedies for '{}' on {}",
        result.remedies.len(),
        request.disease_name,
        request.crop_type
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::llm_client::testing::StubModel;
    use crate::remedies::models::REMEDY_TOOL_NAME;

    fn leaf_blight_request() -> RemedyRequest {
        RemedyRequest {
            disease_name: Some("Leaf Blight".to_string()),
            crop_type: Some("Rice".to_string()),
            diagnosis_details: None,
        }
    }

    fn canned_remedies() -> serde_json::Value {
        json!({
            "remedies": [
                "Apply balanced nitrogen; avoid excess urea",
                "Spray copper oxychloride at 2.5 g/L",
                "Drain fields periodically to reduce humidity"
            ],
            "confidence": 0.78
        })
    }

    #[tokio::test]
    async fn test_suggest_remedies_returns_non_empty_list() {
        let model = StubModel::returning(canned_remedies());

        let result = suggest_remedies(&model, leaf_blight_request()).await.unwrap();

        assert!(!result.remedies.is_empty());
        assert!(result.confidence.map_or(true, |c| (0.0..=1.0).contains(&c)));
    }

    #[tokio::test]
    async fn test_suggest_remedies_is_text_only() {
        let model = StubModel::returning(canned_remedies());

        suggest_remedies(&model, leaf_blight_request()).await.unwrap();

        let sent = model.last_request().unwrap();
        assert!(sent.image.is_none());
        assert_eq!(sent.output.name, REMEDY_TOOL_NAME);
        assert!(sent.prompt.contains("Disease Name: Leaf Blight"));
        assert!(sent.prompt.contains("\"remedies\""));
    }

    #[tokio::test]
    async fn test_missing_disease_name_fails_without_model_call() {
        let model = StubModel::returning(canned_remedies());
        let request = RemedyRequest {
            disease_name: None,
            ..leaf_blight_request()
        };

        let err = suggest_remedies(&model, request).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_timeout_is_model_invocation_error() {
        let model = StubModel::timing_out();

        let err = suggest_remedies(&model, leaf_blight_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ModelInvocation(_)));
    }

    #[tokio::test]
    async fn test_empty_remedy_list_is_empty_result() {
        let model = StubModel::returning(json!({"remedies": []}));

        let err = suggest_remedies(&model, leaf_blight_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyResult));
    }

    #[tokio::test]
    async fn test_null_or_empty_object_answer_is_empty_result() {
        for answer in [serde_json::Value::Null, json!({})] {
            let model = StubModel::returning(answer);

            let err = suggest_remedies(&model, leaf_blight_request())
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::EmptyResult), "got {err:?}");
        }
    }

    #[tokio::test]
    async fn test_blank_remedy_entry_is_rejected() {
        let model = StubModel::returning(json!({"remedies": ["", "Prune"]}));

        let err = suggest_remedies(&model, leaf_blight_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_remedies_of_wrong_type_is_validation_error() {
        let model = StubModel::returning(json!({"remedies": "spray fungicide"}));

        let err = suggest_remedies(&model, leaf_blight_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
