// Remedy suggestions for an already-named disease. Text-only, no image.

pub mod flow;
pub mod handlers;
pub mod models;
pub mod prompts;
