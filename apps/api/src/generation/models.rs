//! Value types shared across the artifact pipeline, plus its error taxonomy.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::generator::GeneratorKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation backend failed: {0}")]
    UpstreamModelFailure(String),

    #[error("job text has no usable role or domain signal ({keywords_found} recognizable keywords)")]
    TemplateMismatch { keywords_found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cover letter has {words} words, budget is {budget}")]
    TooLong { words: usize, budget: usize },

    #[error("cover letter is missing placeholder {token}")]
    MissingPlaceholder { token: String },

    #[error("cover letter repeats placeholder {token} {count} times")]
    DuplicatePlaceholder { token: String, count: usize },

    #[error("only {count} interview tips, need at least {minimum}")]
    TooFewTips { count: usize, minimum: usize },
}

/// Applicant attributes the cover letter may reference.
/// When the bio does not supply one, its placeholder token is used verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApplicantField {
    Name,
    Experience,
    Skills,
}

impl ApplicantField {
    pub const ALL: [ApplicantField; 3] = [
        ApplicantField::Name,
        ApplicantField::Experience,
        ApplicantField::Skills,
    ];

    pub fn placeholder(self) -> &'static str {
        match self {
            ApplicantField::Name => "[Your Name]",
            ApplicantField::Experience => "[Your Experience]",
            ApplicantField::Skills => "[Your Skills]",
        }
    }
}

pub const POSITION_PLACEHOLDER: &str = "[Position Title]";
pub const COMPANY_PLACEHOLDER: &str = "[Company Name]";

/// Cache key: SHA-256 over the job text and bio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestFingerprint(pub(crate) String);

impl RequestFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to correlate log lines.
        f.write_str(&self.0[..self.0.len().min(12)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub body: String,
    pub placeholders: BTreeSet<String>,
    pub word_count: usize,
}

impl CoverLetter {
    pub fn from_body(body: String) -> Self {
        let word_count = count_words(&body);
        let placeholders = find_placeholders(&body);
        Self {
            body,
            placeholders,
            word_count,
        }
    }
}

/// Priority order: Technical > CompanySpecific > Behavioral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipCategory {
    Technical,
    CompanySpecific,
    Behavioral,
}

impl TipCategory {
    /// Lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            TipCategory::Technical => 0,
            TipCategory::CompanySpecific => 1,
            TipCategory::Behavioral => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewTip {
    pub text: String,
    pub category: TipCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub cover_letter: CoverLetter,
    pub tips: Vec<InterviewTip>,
    pub cache_hit: bool,
    pub backend: GeneratorKind,
    pub generated_at: DateTime<Utc>,
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Every `[...]` token of 1–40 characters without nested brackets or line breaks.
pub fn find_placeholders(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut rest = text;
    while let Some(start) = rest.find('[') {
        let after = &rest[start + 1..];
        match after.find(|c: char| c == ']' || c == '[' || c == '\n') {
            Some(end) if after[end..].starts_with(']') && (1..=40).contains(&end) => {
                found.insert(format!("[{}]", &after[..end]));
                rest = &after[end + 1..];
            }
            Some(end) => rest = &after[end..],
            None => break,
        }
    }
    found
}

/// Non-overlapping occurrences of `token` in `text`.
pub fn count_occurrences(text: &str, token: &str) -> usize {
    if token.is_empty() {
        return 0;
    }
    text.matches(token).count()
}
