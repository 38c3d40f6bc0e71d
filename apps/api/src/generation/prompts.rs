// All LLM prompt constants for the artifact generator.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for cover letter + interview tip generation.
pub const ARTIFACT_SYSTEM: &str =
    "You are an experienced career coach who writes concise, honest cover letters \
    and practical interview preparation advice. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Placeholder rule. Replace `{missing_placeholders}` with the tokens the letter must carry.
pub const PLACEHOLDER_INSTRUCTION: &str = "\
    CRITICAL: The applicant profile is missing some details. For each of these tokens, \
    write the token verbatim exactly once in the cover letter where that detail belongs: \
    {missing_placeholders}. Do not use any token more than once.";

/// Artifact prompt template. Replace every `{...}` slot before sending.
pub const ARTIFACT_PROMPT_TEMPLATE: &str = r#"Write a cover letter and interview preparation tips for the job posting below.

{no_fabrication_instruction}

{placeholder_instruction}

JOB POSTING (extracted by OCR, may contain noise):
"""
{job_text}
"""

DETECTED ROLE: {role_title}
DETECTED COMPANY: {company}
KEYWORDS FOUND IN THE POSTING: {keywords_json}

APPLICANT PROFILE:
{applicant_json}

Return a JSON object with this EXACT schema (no extra fields):
{
  "cover_letter": "Dear Hiring Manager,\n\n...\n\nSincerely,\n...",
  "interview_tips": [
    {"text": "Be ready to explain Rust ownership with an example from your work.", "category": "Technical"}
  ]
}

Rules:
- The cover letter must be at most {word_budget} words and fit on one page.
- Use "Dear Hiring Manager," as the greeting and end with "Sincerely," followed by the applicant's name line.
- Use the detected role and company verbatim. If one is "unknown", write [Position Title] or [Company Name] instead.
- Return between {tip_min} and {tip_max} interview tips, each one actionable sentence.
- "category" must be one of "Technical", "CompanySpecific", "Behavioral".
- Put the tips most specific to the keywords first. Do not repeat the same advice twice."#;
