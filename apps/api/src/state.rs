use std::sync::Arc;

use crate::generation::inflight::InFlightRegistry;
use crate::llm_client::LlmClient;
use crate::store::ProposalStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. `PgStore` with `DATABASE_URL`, `MemoryStore` otherwise.
    pub store: Arc<dyn ProposalStore>,
    pub llm: LlmClient,
    /// One live generation per owner; a new one cancels the previous.
    pub inflight: InFlightRegistry,
}
