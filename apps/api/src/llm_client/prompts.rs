// Shared prompt constants and prompt-building utilities.
// Each flow defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt shared by both flows.
pub const PLANT_PATHOLOGIST_SYSTEM: &str = "You are an expert in plant pathology who advises \
    smallholder farmers. Be specific and practical. \
    Answer ONLY by calling the provided tool with arguments that match its schema. \
    Do NOT include explanations or apologies outside the tool call.";

/// Confidence calibration appended to every prompt that asks for a score.
pub const CONFIDENCE_INSTRUCTION: &str = "\
    Report confidence as a number between 0 and 1 inclusive, where 0 means a guess \
    and 1 means certain. Lower it when the image is unclear or the symptoms are ambiguous.";

/// Renders an optional free-text field for a prompt.
pub fn optional_field(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "Not provided",
    }
}
