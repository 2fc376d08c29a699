use std::sync::Arc;

use crate::config::Config;
use crate::lesson::service::GenerationSlot;
use crate::llm_client::TextGenerator;
use crate::settings::ModelStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. Default: `GeminiClient`; tests swap in a stub.
    pub generator: Arc<dyn TextGenerator>,
    /// Durable model selection, read per request.
    pub models: ModelStore,
    /// Guards the single in-flight generation.
    pub slot: GenerationSlot,
    pub config: Config,
}
