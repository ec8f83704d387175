use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ProposalStore, StoreError, TrainingEdit};
use crate::errors::AppError;
use crate::models::proposal::Proposal;
use crate::models::training::{TrainingData, TrainingDataRow};

/// PostgreSQL-backed store. Schema: `migrations/001_init.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens a small pool; generation traffic is one write per proposal.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        info!("PostgreSQL pool ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ProposalStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn training_data(&self, owner: Uuid) -> Result<TrainingData, StoreError> {
        let row = sqlx::query_as::<_, TrainingDataRow>(
            "SELECT * FROM training_data WHERE owner_id = $1",
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TrainingData::from).unwrap_or_default())
    }

    async fn update_training_data(
        &self,
        owner: Uuid,
        edit: TrainingEdit<'_>,
    ) -> Result<TrainingData, AppError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        // Make sure there is a row to lock, then hold it until commit.
        sqlx::query(
            "INSERT INTO training_data (owner_id) VALUES ($1) ON CONFLICT (owner_id) DO NOTHING",
        )
        .bind(owner)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from)?;

        let row = sqlx::query_as::<_, TrainingDataRow>(
            "SELECT * FROM training_data WHERE owner_id = $1 FOR UPDATE",
        )
        .bind(owner)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::from)?;

        // Dropping `tx` on a rejected edit rolls the placeholder row back.
        let next = edit(&TrainingData::from(row))?;

        sqlx::query(
            r#"
            UPDATE training_data
            SET custom_instructions = $2,
                examples = $3,
                is_locked = $4,
                updated_at = NOW()
            WHERE owner_id = $1
            "#,
        )
        .bind(owner)
        .bind(&next.custom_instructions)
        .bind(&next.examples)
        .bind(next.is_locked)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from)?;

        tx.commit().await.map_err(StoreError::from)?;
        Ok(next)
    }

    // Append-only: history rows are never updated.
    async fn append_proposal(&self, owner: Uuid, proposal: &Proposal) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO proposals (id, owner_id, user_id, job_description, proposal_text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(proposal.id)
        .bind(owner)
        .bind(proposal.user_id)
        .bind(&proposal.job_description)
        .bind(&proposal.proposal_text)
        .bind(proposal.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_proposals(&self, owner: Uuid, limit: i64) -> Result<Vec<Proposal>, StoreError> {
        let rows = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT id, job_description, proposal_text, created_at, user_id
            FROM proposals
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_proposal(&self, owner: Uuid, id: Uuid) -> Result<Option<Proposal>, StoreError> {
        let row = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT id, job_description, proposal_text, created_at, user_id
            FROM proposals
            WHERE owner_id = $1 AND id = $2
            "#,
        )
        .bind(owner)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
