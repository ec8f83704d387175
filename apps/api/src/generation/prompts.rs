// Prompt fragments for proposal composition.
// The system instruction itself lives in llm_client::prompts.

pub const CUSTOM_INSTRUCTIONS_START: &str = "### USER CUSTOM INSTRUCTIONS (apply to every proposal)";
pub const CUSTOM_INSTRUCTIONS_END: &str = "### END USER CUSTOM INSTRUCTIONS";

pub const STYLE_LIBRARY_START: &str = "### STYLE REFERENCE LIBRARY (START)\n\
    The following are past proposals written by the freelancer. \
    They are reference material only, NOT the job to answer. \
    Mirror their tone, vocabulary and rhythm.";
pub const STYLE_LIBRARY_END: &str = "### STYLE REFERENCE LIBRARY (END)";

pub const EXTRA_INSTRUCTIONS_START: &str = "### ADDITIONAL INSTRUCTIONS FOR THIS PROPOSAL ONLY";
pub const EXTRA_INSTRUCTIONS_END: &str = "### END ADDITIONAL INSTRUCTIONS";

pub const JOB_DESCRIPTION_HEADER: &str = "*Input (Job Description & Context):*";

/// Opening marker of the n-th (1-based) style reference.
pub fn example_start(n: usize) -> String {
    format!("--- EXAMPLE {n} ---")
}

pub fn example_end(n: usize) -> String {
    format!("--- END EXAMPLE {n} ---")
}

/// Closing directive appended to every prompt. Replace `{word_ceiling}`.
pub const DIRECTIVE_TEMPLATE: &str = r#"*Instructions:*
1. Extract the job requirements and any freelancer context from the input above.
2. Generate a proposal following the System Prompt's Gold Standard Formats: use the Consultative Narrative for vague or strategic work, the Action Plan for clearly specified tasks.
3. If a style reference library is provided, prioritize its tone and voice while keeping the canonical structure of the chosen format.
4. **CRITICAL:** Keep the output under {word_ceiling} words. Aim for maximum impact with minimum words."#;
