//! Field checks shared by both flows' request and result validators.

use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::is_empty_value;

/// Trims `value` and fails with a validation error naming `field` when it is
/// missing or blank.
pub fn required_text(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// Blank optional text is treated as absent.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Confidence scores must be finite and within [0, 1].
pub fn check_confidence(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AppError::Validation(format!(
            "{field} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

/// A model answer of `null`, `{}` or a blank string is no answer, whichever
/// `ModelInvoker` produced it.
pub fn ensure_answer(value: &Value) -> Result<(), AppError> {
    if is_empty_value(value) {
        return Err(AppError::EmptyResult);
    }
    Ok(())
}
