use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageMetrics;
use crate::llm_client::LlmGateway;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds nothing mutable; every request works on its own data.
#[derive(Clone)]
pub struct AppState {
    /// Model gateway. `LlmClient` in production, scripted in tests.
    pub llm: Arc<dyn LlmGateway>,
    pub config: Config,
    /// Page constants for the layout estimate (US Letter, 0.5" margins).
    pub page_metrics: PageMetrics,
}
