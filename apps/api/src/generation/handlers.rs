//! Axum route handlers for the Proposal API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_proposal, GenerateRequest};
use crate::generation::presets::{InstructionPreset, PRESETS};
use crate::models::proposal::Proposal;
use crate::state::AppState;
use crate::store::{owner_key, HISTORY_LIMIT};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// POST /api/v1/proposals/generate
///
/// Composes the prompt, calls the selected provider once, and returns the
/// stored history entry.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Proposal>, AppError> {
    let proposal =
        generate_proposal(state.store.as_ref(), &state.llm, &state.inflight, request).await?;
    Ok(Json(proposal))
}

/// GET /api/v1/proposals
pub async fn handle_list_proposals(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<Proposal>>, AppError> {
    let limit = params.limit.unwrap_or(HISTORY_LIMIT).clamp(1, HISTORY_LIMIT);
    let owner = owner_key(params.user_id, params.client_id)?;
    let history = state.store.list_proposals(owner, limit).await?;
    Ok(Json(history))
}

/// GET /api/v1/proposals/:id
pub async fn handle_get_proposal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Proposal>, AppError> {
    let owner = owner_key(params.user_id, params.client_id)?;
    let proposal = state
        .store
        .get_proposal(owner, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))?;
    Ok(Json(proposal))
}

/// GET /api/v1/presets
pub async fn handle_presets() -> Json<&'static [InstructionPreset]> {
    Json(PRESETS)
}
