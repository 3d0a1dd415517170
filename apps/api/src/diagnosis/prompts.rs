// Prompt template for the diagnosis flow.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::diagnosis::models::ValidDiagnosisRequest;
use crate::llm_client::prompts::{optional_field, CONFIDENCE_INSTRUCTION};
use crate::models::crop::supported_crops_phrase;

/// Diagnosis prompt template. The photo travels as a separate image part.
/// Replace: {supported_crops}, {crop_type}, {symptoms}, {confidence_instruction}
pub const DIAGNOSIS_PROMPT_TEMPLATE: &str = r#"You specialize in diagnosing diseases in crops such as {supported_crops}.

Analyze the attached image of the crop and any described symptoms to identify potential diseases.

Provide a diagnosis with a confidence level and suggest appropriate actions for treatment.

Crop Type: {crop_type}
Symptoms: {symptoms}

{confidence_instruction}

Based on the image and provided details, diagnose the crop disease and suggest treatment methods."#;

/// Renders the diagnosis prompt. Pure: the same request always yields the same text.
pub fn build_diagnosis_prompt(request: &ValidDiagnosisRequest) -> String {
    DIAGNOSIS_PROMPT_TEMPLATE
        .replace("{supported_crops}", &supported_crops_phrase())
        .replace("{crop_type}", &request.crop_type)
        .replace("{symptoms}", optional_field(request.symptoms.as_deref()))
        .replace("{confidence_instruction}", CONFIDENCE_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::DataUri;

    fn request(crop: &str, symptoms: Option<&str>) -> ValidDiagnosisRequest {
        ValidDiagnosisRequest {
            image: DataUri::parse("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap(),
            crop_type: crop.to_string(),
            symptoms: symptoms.map(str::to_string),
        }
    }

    #[test]
    fn test_prompt_embeds_crop_and_symptoms() {
        let prompt = build_diagnosis_prompt(&request("Tomato", Some("yellow spots")));
        assert!(prompt.contains("Crop Type: Tomato"));
        assert!(prompt.contains("Symptoms: yellow spots"));
        assert!(prompt.contains("Guava, Mango, Tomato, Cotton, and Rice"));
    }

    #[test]
    fn test_prompt_marks_missing_symptoms() {
        let prompt = build_diagnosis_prompt(&request("Rice", None));
        assert!(prompt.contains("Symptoms: Not provided"));
    }

    #[test]
    fn test_prompt_leaves_no_placeholders() {
        let prompt = build_diagnosis_prompt(&request("Cotton", Some("wilting")));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_does_not_inline_image_payload() {
        let prompt = build_diagnosis_prompt(&request("Mango", None));
        assert!(!prompt.contains("base64"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let r = request("Guava", Some("black lesions on fruit"));
        assert_eq!(build_diagnosis_prompt(&r), build_diagnosis_prompt(&r));
    }
}
