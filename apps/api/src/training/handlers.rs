use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::training::TrainingData;
use crate::state::AppState;
use crate::store::owner_key;
use crate::training::editor::{add_example, apply_update, remove_example, TrainingUpdate};

/// Identifies the profile owner on query-string routes.
#[derive(Deserialize)]
pub struct OwnerQuery {
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct AddExampleRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, alias = "clientId")]
    pub client_id: Option<Uuid>,
    pub text: String,
}

/// GET /api/v1/training
pub async fn handle_get_training(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<TrainingData>, AppError> {
    let owner = owner_key(params.user_id, params.client_id)?;
    let data = state.store.training_data(owner).await?;
    Ok(Json(data))
}

/// PUT /api/v1/training
pub async fn handle_update_training(
    State(state): State<AppState>,
    Json(update): Json<TrainingUpdate>,
) -> Result<Json<TrainingData>, AppError> {
    let owner = owner_key(update.user_id, update.client_id)?;
    let next = state
        .store
        .update_training_data(
            owner,
            Box::new(move |current: &TrainingData| apply_update(current, update)),
        )
        .await?;

    info!(
        "Training data updated for owner {} (examples={}, locked={})",
        owner,
        next.examples.len(),
        next.is_locked
    );
    Ok(Json(next))
}

/// POST /api/v1/training/examples
pub async fn handle_add_example(
    State(state): State<AppState>,
    Json(request): Json<AddExampleRequest>,
) -> Result<Json<TrainingData>, AppError> {
    let owner = owner_key(request.user_id, request.client_id)?;
    let text = request.text;
    let next = state
        .store
        .update_training_data(
            owner,
            Box::new(move |current: &TrainingData| add_example(current, &text)),
        )
        .await?;
    Ok(Json(next))
}

/// DELETE /api/v1/training/examples/:index
pub async fn handle_remove_example(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<TrainingData>, AppError> {
    let owner = owner_key(params.user_id, params.client_id)?;
    let next = state
        .store
        .update_training_data(
            owner,
            Box::new(move |current: &TrainingData| remove_example(current, index)),
        )
        .await?;
    Ok(Json(next))
}
