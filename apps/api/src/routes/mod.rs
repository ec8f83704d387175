pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::generation::handlers as proposals;
use crate::state::AppState;
use crate::training::handlers as training;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Proposal API
        .route(
            "/api/v1/proposals/generate",
            post(proposals::handle_generate),
        )
        .route("/api/v1/proposals", get(proposals::handle_list_proposals))
        .route("/api/v1/proposals/:id", get(proposals::handle_get_proposal))
        .route("/api/v1/presets", get(proposals::handle_presets))
        // Training Studio API
        .route(
            "/api/v1/training",
            get(training::handle_get_training).put(training::handle_update_training),
        )
        .route(
            "/api/v1/training/examples",
            post(training::handle_add_example),
        )
        .route(
            "/api/v1/training/examples/:index",
            delete(training::handle_remove_example),
        )
        .with_state(state)
}
