use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::OutputSchema;
use crate::validation::{check_confidence, optional_text, required_text};

/// Request body for remedy suggestions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedyRequest {
    #[serde(default)]
    pub disease_name: Option<String>,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub diagnosis_details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidRemedyRequest {
    pub disease_name: String,
    pub crop_type: String,
    pub diagnosis_details: Option<String>,
}

impl RemedyRequest {
    pub fn validate(self) -> Result<ValidRemedyRequest, AppError> {
        Ok(ValidRemedyRequest {
            disease_name: required_text(self.disease_name.as_deref(), "diseaseName")?,
            crop_type: required_text(self.crop_type.as_deref(), "cropType")?,
            diagnosis_details: optional_text(self.diagnosis_details.as_deref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedyResult {
    pub remedies: Vec<String>,
    /// 0.0 – 1.0, when the model reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RemedyResult {
    /// An empty remedy list is no answer at all. Blank entries among real ones
    /// are malformed. A present confidence must be in [0, 1].
    pub fn validate(&self) -> Result<(), AppError> {
        if self.remedies.iter().all(|r| r.trim().is_empty()) {
            return Err(AppError::EmptyResult);
        }
        if self.remedies.iter().any(|r| r.trim().is_empty()) {
            return Err(AppError::Validation(
                "model returned a blank entry in remedies".to_string(),
            ));
        }
        match self.confidence {
            Some(confidence) => check_confidence(confidence, "confidence"),
            None => Ok(()),
        }
    }
}

/// Tool the model must call with its remedies.
pub const REMEDY_TOOL_NAME: &str = "suggest_remedies";

pub fn remedy_output_schema() -> OutputSchema {
    OutputSchema {
        name: REMEDY_TOOL_NAME,
        description: "Record the suggested remedies for the diagnosed crop disease.",
        schema: remedy_json_schema(),
    }
}

pub fn remedy_json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "remedies": {
                "type": "array",
                "items": {"type": "string"},
                "description": "A list of suggested remedies or treatments for the disease."
            },
            "confidence": {
                "type": "number",
                "minimum": 0,
                "maximum": 1,
                "description": "A confidence score (0-1) indicating the reliability of the suggested remedies."
            }
        },
        "required": ["remedies"]
    })
}
