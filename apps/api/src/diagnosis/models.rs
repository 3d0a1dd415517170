use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::OutputSchema;
use crate::media::DataUri;
use crate::validation::{check_confidence, optional_text, required_text};

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Request body for a diagnosis, as sent by the form.
///
/// Fields are optional at the serde layer so that a missing photo or crop
/// type is reported by `validate` rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRequest {
    /// `data:<mimetype>;base64,<encoded_data>`
    #[serde(default, alias = "image", alias = "photo")]
    pub photo_data_uri: Option<String>,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
}

/// A request that passed validation; the only input the prompt builder accepts.
#[derive(Debug, Clone)]
pub struct ValidDiagnosisRequest {
    pub image: DataUri,
    pub crop_type: String,
    pub symptoms: Option<String>,
}

impl DiagnosisRequest {
    pub fn validate(self) -> Result<ValidDiagnosisRequest, AppError> {
        let crop_type = required_text(self.crop_type.as_deref(), "cropType")?;
        let image = DataUri::parse(self.photo_data_uri.as_deref().unwrap_or_default())?;

        Ok(ValidDiagnosisRequest {
            image,
            crop_type,
            symptoms: optional_text(self.symptoms.as_deref()),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseIdentification {
    pub disease_name: String,
    /// 0.0 – 1.0
    pub confidence_level: f64,
}

/// The model's diagnosis, exactly as the output schema describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub disease_identification: DiseaseIdentification,
    pub recommended_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl DiagnosisResult {
    pub fn disease_name(&self) -> &str {
        &self.disease_identification.disease_name
    }

    pub fn confidence_level(&self) -> f64 {
        self.disease_identification.confidence_level
    }

    /// Checks what the JSON schema alone cannot: a non-blank disease name, no
    /// blank action entries and a confidence inside [0, 1].
    pub fn validate(&self) -> Result<(), AppError> {
        if self.disease_name().trim().is_empty() {
            return Err(AppError::Validation(
                "model returned an empty diseaseName".to_string(),
            ));
        }
        if self.recommended_actions.iter().any(|a| a.trim().is_empty()) {
            return Err(AppError::Validation(
                "model returned a blank entry in recommendedActions".to_string(),
            ));
        }
        check_confidence(self.confidence_level(), "confidenceLevel")
    }
}

/// Tool the model must call with its diagnosis.
pub const DIAGNOSIS_TOOL_NAME: &str = "record_diagnosis";

pub fn diagnosis_output_schema() -> OutputSchema {
    OutputSchema {
        name: DIAGNOSIS_TOOL_NAME,
        description: "Record the crop disease diagnosis and the recommended treatment actions.",
        schema: diagnosis_json_schema(),
    }
}

fn diagnosis_json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "diseaseIdentification": {
                "type": "object",
                "properties": {
                    "diseaseName": {
                        "type": "string",
                        "description": "The identified disease name."
                    },
                    "confidenceLevel": {
                        "type": "number",
                        "minimum": 0,
                        "maximum": 1,
                        "description": "The confidence level of the disease identification (0-1)."
                    }
                },
                "required": ["diseaseName", "confidenceLevel"]
            },
            "recommendedActions": {
                "type": "array",
                "items": {"type": "string"},
                "description": "A list of recommended actions to treat the disease."
            },
            "additionalNotes": {
                "type": "string",
                "description": "Any additional notes or observations."
            }
        },
        "required": ["diseaseIdentification", "recommendedActions"]
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Confidence presentation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    /// high > 75%, medium > 40%, low otherwise.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            p if p > 75 => ConfidenceBand::High,
            p if p > 40 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

/// Rounds a [0, 1] confidence to a whole percentage.
pub fn confidence_percent(level: f64) -> u8 {
    (level * 100.0).round().clamp(0.0, 100.0) as u8
}
