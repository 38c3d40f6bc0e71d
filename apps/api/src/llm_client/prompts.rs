// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to all generation prompts.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Every statement about the applicant must come from the applicant profile \
    provided below. Do NOT infer, interpolate, or invent employers, titles, years, degrees, \
    or skills. If the profile does not support a claim, omit it entirely.";
