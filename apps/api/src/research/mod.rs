// VC research: prompt building, provider call, extraction, validation, fallback.
// All LLM calls go through llm_client; this module never talks HTTP to the provider.

pub mod extractor;
pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod validation;
