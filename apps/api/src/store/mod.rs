//! Persistence for training profiles and proposal history.
//!
//! `AppState` holds an `Arc<dyn ProposalStore>`: `PgStore` when
//! `DATABASE_URL` is set, `MemoryStore` otherwise (and in tests).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::Proposal;
use crate::models::training::TrainingData;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Default page size for history listings.
pub const HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Key for per-owner records. Signed-in users are keyed by their id;
/// anonymous browsers by the `client_id` they generate and keep locally.
/// Requests carrying neither are rejected so unrelated visitors never share
/// a profile, a history, or an in-flight slot.
pub fn owner_key(user_id: Option<Uuid>, client_id: Option<Uuid>) -> Result<Uuid, AppError> {
    user_id
        .or(client_id)
        .ok_or_else(|| AppError::Validation("user_id or client_id is required".to_string()))
}

/// Edit applied to an owner's training data while the store holds it.
pub type TrainingEdit<'a> =
    Box<dyn FnOnce(&TrainingData) -> Result<TrainingData, AppError> + Send + 'a>;

#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Short backend label for `/health`.
    fn backend(&self) -> &'static str;

    /// Returns the owner's training data, or an empty profile if none exists yet.
    async fn training_data(&self, owner: Uuid) -> Result<TrainingData, StoreError>;

    /// Load, edit and save as one step. Concurrent edits for the same owner
    /// are serialised; a rejected edit leaves the stored profile untouched.
    async fn update_training_data(
        &self,
        owner: Uuid,
        edit: TrainingEdit<'_>,
    ) -> Result<TrainingData, AppError>;

    async fn append_proposal(&self, owner: Uuid, proposal: &Proposal) -> Result<(), StoreError>;

    /// Newest first, at most `limit` entries.
    async fn list_proposals(&self, owner: Uuid, limit: i64)
        -> Result<Vec<Proposal>, StoreError>;

    async fn get_proposal(&self, owner: Uuid, id: Uuid) -> Result<Option<Proposal>, StoreError>;
}
