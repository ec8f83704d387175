//! Proposal Generation — composes the prompt, dispatches it, records history.
//!
//! Flow: validate → resolve training snapshot → register in-flight →
//!       compose_prompt → LlmClient::generate → append to history.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::composer::{compose_prompt, ComposeInput};
use crate::generation::inflight::InFlightRegistry;
use crate::llm_client::{ApiConfig, LlmClient, LlmError};
use crate::models::proposal::Proposal;
use crate::models::training::TrainingData;
use crate::store::{owner_key, ProposalStore};

/// Request body for proposal generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Browser-generated id for anonymous callers.
    #[serde(default, alias = "clientId")]
    pub client_id: Option<Uuid>,
    #[serde(alias = "summary")]
    pub job_description: String,
    #[serde(default)]
    pub extra_instructions: Option<String>,
    /// Snapshot sent by the client. When absent the owner's stored profile is used.
    #[serde(default)]
    pub training_data: Option<TrainingData>,
    #[serde(default)]
    pub api_config: Option<ApiConfig>,
}

/// Composes the prompt and runs exactly one provider call.
///
/// No history is written and nothing is retried; that is the caller's call.
pub async fn generate(
    llm: &LlmClient,
    job_description: &str,
    training: Option<&TrainingData>,
    extra_instructions: Option<&str>,
    api_config: Option<&ApiConfig>,
    cancel: &CancellationToken,
) -> Result<String, AppError> {
    let composed = compose_prompt(&ComposeInput {
        job_description,
        training,
        extra_instructions,
    })?;

    let text = llm
        .generate(
            &composed.prompt,
            composed.system_instruction,
            api_config,
            cancel,
        )
        .await?;

    Ok(text)
}

/// Runs a full generation for one owner and appends the result to history.
///
/// The owner is the signed-in user, else the anonymous browser's client id.
/// A newer generation for the same owner cancels this one; a cancelled
/// generation never reaches history.
pub async fn generate_proposal(
    store: &dyn ProposalStore,
    llm: &LlmClient,
    inflight: &InFlightRegistry,
    request: GenerateRequest,
) -> Result<Proposal, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let owner = owner_key(request.user_id, request.client_id)?;
    let training = match request.training_data {
        Some(snapshot) => snapshot,
        None => store.training_data(owner).await?,
    };

    info!(
        "Generating proposal for owner {} ({} style examples)",
        owner,
        training.examples.len()
    );

    let ticket = inflight.begin(owner).await;
    let result = generate(
        llm,
        &request.job_description,
        Some(&training),
        request.extra_instructions.as_deref(),
        request.api_config.as_ref(),
        &ticket.token,
    )
    .await;
    inflight.finish(&ticket).await;

    let proposal_text = result?;
    if ticket.token.is_cancelled() {
        return Err(LlmError::Cancelled.into());
    }

    let proposal = Proposal::new(&request.job_description, proposal_text, request.user_id);
    store.append_proposal(owner, &proposal).await?;

    info!("Stored proposal {} for owner {}", proposal.id, owner);
    Ok(proposal)
}
