use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One history entry: a job description and the proposal generated for it.
/// Written once after a successful generation and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Proposal {
    pub id: Uuid,
    pub job_description: String,
    pub proposal_text: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

impl Proposal {
    pub fn new(job_description: &str, proposal_text: String, user_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_description: job_description.to_string(),
            proposal_text,
            created_at: Utc::now(),
            user_id,
        }
    }
}
