//! Prompt Composer — turns a job description plus the freelancer's style
//! profile into the single prompt sent to a provider.
//!
//! The prompt is an ordered list of blocks. Each optional block is a
//! `(predicate, builder)` pair: when the predicate rejects the inputs the
//! block is left out entirely, never emitted as an empty delimiter pair.
//!
//! Block order is fixed: custom instructions → style reference library →
//! extra instructions → job description → directive.

use thiserror::Error;

use crate::generation::prompts::{
    example_end, example_start, CUSTOM_INSTRUCTIONS_END, CUSTOM_INSTRUCTIONS_START,
    DIRECTIVE_TEMPLATE, EXTRA_INSTRUCTIONS_END, EXTRA_INSTRUCTIONS_START,
    JOB_DESCRIPTION_HEADER, STYLE_LIBRARY_END, STYLE_LIBRARY_START,
};
use crate::llm_client::prompts::{PROPOSAL_SYSTEM, WORD_CEILING};
use crate::models::training::TrainingData;

#[derive(Debug, Error, PartialEq)]
pub enum ComposeError {
    #[error("job description cannot be empty")]
    EmptyJobDescription,
}

/// Composer output: the user prompt and the system instruction that must
/// travel with it in the provider's separate system field.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub prompt: String,
    pub system_instruction: &'static str,
}

/// Borrowed view of everything the composer reads.
pub struct ComposeInput<'a> {
    pub job_description: &'a str,
    pub training: Option<&'a TrainingData>,
    pub extra_instructions: Option<&'a str>,
}

type Predicate = fn(&ComposeInput<'_>) -> bool;
type Builder = fn(&ComposeInput<'_>) -> String;

/// Prompt blocks in emission order.
const BLOCKS: [(Predicate, Builder); 5] = [
    (has_custom_instructions as Predicate, custom_instructions_block as Builder),
    (has_examples as Predicate, style_library_block as Builder),
    (has_extra_instructions as Predicate, extra_instructions_block as Builder),
    (always as Predicate, job_description_block as Builder),
    (always as Predicate, directive_block as Builder),
];

fn not_blank(text: &str) -> bool {
    !text.trim().is_empty()
}

fn always(_: &ComposeInput<'_>) -> bool {
    true
}

fn has_custom_instructions(input: &ComposeInput<'_>) -> bool {
    input
        .training
        .is_some_and(|t| not_blank(&t.custom_instructions))
}

/// Non-blank examples in list order. Blank entries are skipped, not numbered.
fn usable_examples<'a>(input: &ComposeInput<'a>) -> impl Iterator<Item = &'a String> {
    input
        .training
        .into_iter()
        .flat_map(|t| t.examples.iter())
        .filter(|e| not_blank(e))
}

fn has_examples(input: &ComposeInput<'_>) -> bool {
    usable_examples(input).next().is_some()
}

fn has_extra_instructions(input: &ComposeInput<'_>) -> bool {
    input.extra_instructions.is_some_and(not_blank)
}

fn custom_instructions_block(input: &ComposeInput<'_>) -> String {
    let text = input
        .training
        .map(|t| t.custom_instructions.as_str())
        .unwrap_or_default();
    format!("{CUSTOM_INSTRUCTIONS_START}\n{text}\n{CUSTOM_INSTRUCTIONS_END}")
}

fn style_library_block(input: &ComposeInput<'_>) -> String {
    let mut block = String::from(STYLE_LIBRARY_START);
    for (i, example) in usable_examples(input).enumerate() {
        let n = i + 1;
        block.push_str(&format!("\n\n{}\n{example}\n{}", example_start(n), example_end(n)));
    }
    block.push_str("\n\n");
    block.push_str(STYLE_LIBRARY_END);
    block
}

fn extra_instructions_block(input: &ComposeInput<'_>) -> String {
    let text = input.extra_instructions.unwrap_or_default();
    format!("{EXTRA_INSTRUCTIONS_START}\n{text}\n{EXTRA_INSTRUCTIONS_END}")
}

fn job_description_block(input: &ComposeInput<'_>) -> String {
    format!("{JOB_DESCRIPTION_HEADER}\n{}", input.job_description)
}

fn directive_block(_: &ComposeInput<'_>) -> String {
    DIRECTIVE_TEMPLATE.replace("{word_ceiling}", &WORD_CEILING.to_string())
}

/// Builds the prompt for one generation. Pure: the same input always
/// yields byte-identical output.
pub fn compose_prompt(input: &ComposeInput<'_>) -> Result<ComposedPrompt, ComposeError> {
    if !not_blank(input.job_description) {
        return Err(ComposeError::EmptyJobDescription);
    }

    let prompt = BLOCKS
        .iter()
        .filter(|(applies, _)| applies(input))
        .map(|(_, build)| build(input))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(ComposedPrompt {
        prompt,
        system_instruction: PROPOSAL_SYSTEM,
    })
}
