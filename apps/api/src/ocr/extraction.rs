//! Text Extraction Adapter — turns an OCR payload into a normalized `JobPosting`.
//!
//! Classification order: upstream failure → too few tokens → low alphabetic ratio.
//! No retries happen here; transport retries belong to `OcrClient`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum whitespace-separated tokens for a posting to be usable.
pub const MIN_TOKENS: usize = 10;
/// Minimum alphabetic / non-whitespace character ratio. Below this the text is noise.
pub const MIN_ALPHA_RATIO: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("job text is empty or too short ({tokens} tokens, need at least {minimum})")]
    Empty { tokens: usize, minimum: usize },

    #[error("job text looks garbled (alphabetic ratio {alpha_ratio:.2})")]
    Garbled { alpha_ratio: f32 },

    #[error("OCR processing failed: {0}")]
    ServiceFailure(String),
}

/// Core-facing shape of an OCR response, independent of the OCR vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrPayload {
    pub text: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl OcrPayload {
    /// A successful payload carrying already-available text (e.g. pasted job descriptions).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Normalized job-posting text. Only `extract_job_posting` creates one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    raw_text: String,
    extracted_at: DateTime<Utc>,
    source_confidence: f32,
}

impl JobPosting {
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }

    /// In [0, 1]. Derived from the alphabetic ratio of the normalized text.
    pub fn source_confidence(&self) -> f32 {
        self.source_confidence
    }
}

pub fn extract_job_posting(payload: &OcrPayload) -> Result<JobPosting, ExtractionError> {
    if !payload.success {
        let message = payload
            .error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("Unknown error");
        return Err(ExtractionError::ServiceFailure(message.to_string()));
    }

    let text = normalize_ocr_text(&payload.text);

    let tokens = text.split_whitespace().count();
    if tokens < MIN_TOKENS {
        return Err(ExtractionError::Empty {
            tokens,
            minimum: MIN_TOKENS,
        });
    }

    let alpha_ratio = alphabetic_ratio(&text);
    if alpha_ratio < MIN_ALPHA_RATIO {
        return Err(ExtractionError::Garbled { alpha_ratio });
    }

    Ok(JobPosting {
        raw_text: text,
        extracted_at: Utc::now(),
        source_confidence: alpha_ratio.clamp(0.0, 1.0),
    })
}

/// Cleans raw OCR output into plain text.
///
/// - CRLF / CR become LF, control characters other than `\n` and `\t` are dropped
/// - words split by a hyphenated line break are rejoined
/// - whitespace runs inside a line collapse to one space, lines are trimmed
/// - any run of blank lines collapses to a single blank line
pub fn normalize_ocr_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned: String = unified
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    let mut out: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in cleaned.split('\n') {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if !pending_blank {
            if let Some(prev) = out.last_mut() {
                if ends_with_hyphenated_word(prev) && starts_lowercase(&line) {
                    prev.pop();
                    prev.push_str(&line);
                    continue;
                }
            }
        }

        if pending_blank {
            out.push(String::new());
            pending_blank = false;
        }
        out.push(line);
    }

    out.join("\n")
}

fn ends_with_hyphenated_word(line: &str) -> bool {
    let mut rev = line.chars().rev();
    matches!((rev.next(), rev.next()), (Some('-'), Some(c)) if c.is_alphabetic())
}

fn starts_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_lowercase())
}

fn alphabetic_ratio(text: &str) -> f32 {
    let mut visible = 0usize;
    let mut alphabetic = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        visible += 1;
        if c.is_alphabetic() {
            alphabetic += 1;
        }
    }
    if visible == 0 {
        return 0.0;
    }
    alphabetic as f32 / visible as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING: &str = "Senior Backend Engineer at Acme Corp\r\n\r\n\r\n\
        We are looking for an engineer with Rust and PostgreSQL experi-\n\
        ence to build our payments platform.\tRemote friendly.";

    #[test]
    fn test_failed_payload_is_service_failure() {
        let err = extract_job_posting(&OcrPayload::failed("Invalid API key")).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::ServiceFailure("Invalid API key".to_string())
        );
    }

    #[test]
    fn test_failed_payload_without_message_uses_default() {
        let payload = OcrPayload {
            text: "ignored".to_string(),
            success: false,
            error_message: None,
        };
        let err = extract_job_posting(&payload).unwrap_err();
        assert_eq!(err, ExtractionError::ServiceFailure("Unknown error".to_string()));
    }

    #[test]
    fn test_empty_text_is_empty() {
        let err = extract_job_posting(&OcrPayload::from_text("   \n\n ")).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Empty {
                tokens: 0,
                minimum: MIN_TOKENS
            }
        );
    }

    #[test]
    fn test_short_text_is_empty() {
        let err = extract_job_posting(&OcrPayload::from_text("Rust engineer wanted")).unwrap_err();
        assert!(matches!(err, ExtractionError::Empty { tokens: 3, .. }));
    }

    #[test]
    fn test_noise_is_garbled() {
        let noise = "|| 1l1 ## $$ 0O0 %% ^^ 42 ;; :: ** 99 ++ == -- ~~ @@";
        let err = extract_job_posting(&OcrPayload::from_text(noise)).unwrap_err();
        assert!(matches!(err, ExtractionError::Garbled { .. }));
    }

    #[test]
    fn test_valid_posting_is_normalized() {
        let posting = extract_job_posting(&OcrPayload::from_text(POSTING)).unwrap();
        let text = posting.raw_text();
        assert!(text.starts_with("Senior Backend Engineer at Acme Corp\n\nWe are"));
        assert!(text.contains("experience to build"));
        assert!(!text.contains('\r'));
        assert!(!text.contains('\t'));
        assert!(posting.source_confidence() > MIN_ALPHA_RATIO);
        assert!(posting.source_confidence() <= 1.0);
    }

    #[test]
    fn test_hyphen_before_capital_is_kept() {
        let normalized = normalize_ocr_text("Full-\nStack developer");
        assert_eq!(normalized, "Full-\nStack developer");
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let normalized = normalize_ocr_text("a\n\n\n\n\nb\n\nc");
        assert_eq!(normalized, "a\n\nb\n\nc");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let normalized = normalize_ocr_text("Rust\u{0007} developer\u{0000}");
        assert_eq!(normalized, "Rust developer");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_ocr_text(POSTING);
        assert_eq!(normalize_ocr_text(&once), once);
    }
}
