// Artifact Generation
// Implements: input normalization, posting analysis, cover letter and tip drafting,
// validation, and the single-flight artifact cache.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod cache;
pub mod cover_letter;
pub mod crafter;
pub mod generator;
pub mod handlers;
pub mod jd_parser;
pub mod lexicon;
pub mod models;
pub mod profile;
pub mod prompts;
pub mod tips;
pub mod validation;
