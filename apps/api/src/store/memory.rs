use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProposalStore, StoreError, TrainingEdit};
use crate::errors::AppError;
use crate::models::proposal::Proposal;
use crate::models::training::TrainingData;

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    training: RwLock<HashMap<Uuid, TrainingData>>,
    // Append order per owner; reversed on read.
    history: RwLock<HashMap<Uuid, Vec<Proposal>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn training_data(&self, owner: Uuid) -> Result<TrainingData, StoreError> {
        Ok(self
            .training
            .read()
            .await
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_training_data(
        &self,
        owner: Uuid,
        edit: TrainingEdit<'_>,
    ) -> Result<TrainingData, AppError> {
        // Write guard spans the whole read-modify-write.
        let mut training = self.training.write().await;
        let current = training.get(&owner).cloned().unwrap_or_default();
        let next = edit(&current)?;
        training.insert(owner, next.clone());
        Ok(next)
    }

    async fn append_proposal(&self, owner: Uuid, proposal: &Proposal) -> Result<(), StoreError> {
        self.history
            .write()
            .await
            .entry(owner)
            .or_default()
            .push(proposal.clone());
        Ok(())
    }

    async fn list_proposals(&self, owner: Uuid, limit: i64) -> Result<Vec<Proposal>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .history
            .read()
            .await
            .get(&owner)
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_proposal(&self, owner: Uuid, id: Uuid) -> Result<Option<Proposal>, StoreError> {
        Ok(self
            .history
            .read()
            .await
            .get(&owner)
            .and_then(|entries| entries.iter().find(|p| p.id == id).cloned()))
    }
}
