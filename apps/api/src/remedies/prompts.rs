// Prompt template for the remedy flow.

use crate::errors::AppError;
use crate::llm_client::prompts::{optional_field, CONFIDENCE_INSTRUCTION};
use crate::remedies::models::{remedy_json_schema, ValidRemedyRequest};

/// Remedy prompt template. The output schema is repeated in the text as a
/// formatting aid on top of the forced tool call.
/// Replace: {crop_type}, {disease_name}, {diagnosis_details},
///          {confidence_instruction}, {output_schema}
pub const REMEDY_PROMPT_TEMPLATE: &str = r#"You are providing advice to farmers on how to treat diseases.

Given the following disease diagnosis, suggest potential remedies or treatments.

Crop Type: {crop_type}
Disease Name: {disease_name}
Diagnosis Details: {diagnosis_details}

Provide a list of specific, actionable remedies that the farmer can take to address the disease. Focus on practical and easily implementable solutions.
Include a confidence score (0-1) to show how sure you are of the remedies.
{confidence_instruction}

Format your output as a JSON object matching the following schema:
{output_schema}"#;

/// Renders the remedy prompt, embedding the pretty-printed output schema.
pub fn build_remedy_prompt(request: &ValidRemedyRequest) -> Result<String, AppError> {
    let output_schema = serde_json::to_string_pretty(&remedy_json_schema())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize remedy schema: {e}")))?;

    Ok(REMEDY_PROMPT_TEMPLATE
        .replace("{crop_type}", &request.crop_type)
        .replace("{disease_name}", &request.disease_name)
        .replace(
            "{diagnosis_details}",
            optional_field(request.diagnosis_details.as_deref()),
        )
        .replace("{confidence_instruction}", CONFIDENCE_INSTRUCTION)
        .replace("{output_schema}", &output_schema))
}
