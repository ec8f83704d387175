//! Latest-request-wins bookkeeping for generations.
//!
//! Each owner has at most one live cancellation token. Starting a new
//! generation cancels the previous one, so a slow stale reply can never land
//! in history after a newer request was issued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InFlightRegistry {
    slots: Arc<Mutex<HashMap<Uuid, (u64, CancellationToken)>>>,
    next_ticket: Arc<AtomicU64>,
}

/// Handle for one registered generation.
pub struct InFlightTicket {
    owner: Uuid,
    ticket: u64,
    pub token: CancellationToken,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new generation for `owner`, cancelling whatever was running.
    pub async fn begin(&self, owner: Uuid) -> InFlightTicket {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self
            .slots
            .lock()
            .await
            .insert(owner, (ticket, token.clone()));
        if let Some((_, stale)) = previous {
            stale.cancel();
        }

        InFlightTicket {
            owner,
            ticket,
            token,
        }
    }

    /// Releases the slot if it still belongs to `ticket`.
    pub async fn finish(&self, ticket: &InFlightTicket) {
        let mut slots = self.slots.lock().await;
        if slots.get(&ticket.owner).is_some_and(|(t, _)| *t == ticket.ticket) {
            slots.remove(&ticket.owner);
        }
    }

    #[cfg(test)]
    pub async fn active(&self) -> usize {
        self.slots.lock().await.len()
    }
}
