// Shared prompt constants. Document-specific prompt templates live next to the
// code that fills them (see analysis/prompts.rs).

/// System prompt used for every completion. Enforces a plain line-per-item answer.
pub const SKILL_EXTRACTION_SYSTEM: &str = "You are a precise recruiting assistant. \
    You extract skills from documents. \
    Respond with one skill per line and nothing else. \
    Do NOT number the lines. \
    Do NOT include headings, explanations or apologies.";
