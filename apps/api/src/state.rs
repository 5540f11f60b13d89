use std::sync::Arc;

use crate::llm_client::CompletionProvider;
use crate::research::validation::ResponseValidator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-request data; every research request runs independently.
#[derive(Clone)]
pub struct AppState {
    /// Research provider. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn CompletionProvider>,
    /// Ordered hallucination checks applied to every live answer.
    pub validator: Arc<ResponseValidator>,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self {
            llm,
            validator: Arc::new(ResponseValidator::default()),
        }
    }
}
