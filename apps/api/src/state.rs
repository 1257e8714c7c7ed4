use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users, properties and reservations. Postgres in production, in-memory in tests.
    pub store: Arc<dyn CatalogStore>,
    /// Completion backend used by the recommendation pipeline.
    pub llm: Arc<dyn CompletionClient>,
}
