// Crop disease diagnosis: photo + crop type + symptoms → disease, confidence, actions.
// The model is reached only through llm_client::ModelInvoker.

pub mod flow;
pub mod handlers;
pub mod models;
pub mod prompts;
