// Proposal generation: prompt composition, provider dispatch, history.
// All provider calls go through llm_client — no direct HTTP calls here.

pub mod composer;
pub mod generator;
pub mod handlers;
pub mod inflight;
pub mod presets;
pub mod prompts;
