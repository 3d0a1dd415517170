use std::sync::Arc;

use crate::llm_client::ModelInvoker;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing here is mutable: each request runs its flow independently.
#[derive(Clone)]
pub struct AppState {
    /// Production: `LlmClient`. Tests swap in a stub.
    pub model: Arc<dyn ModelInvoker>,
}
