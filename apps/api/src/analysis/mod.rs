// Matching pipeline: text extraction, skill extraction, overlap scoring and
// aggregation across every job description and resume.
// All LLM calls go through llm_client, no direct API calls here.

pub mod aggregate;
pub mod handlers;
pub mod overlap;
pub mod prompts;
pub mod repository;
pub mod skills;
pub mod text;
