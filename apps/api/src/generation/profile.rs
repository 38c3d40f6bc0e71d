//! Input Normalizer — free-text bio → `ApplicantProfile`, and job + bio → `GenerationRequest`.
//!
//! Never fails. Every field on the profile is copied out of the bio text; nothing is
//! inferred. Fields that cannot be found stay empty so the cover letter uses placeholders.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::generation::lexicon::{detect_signals, SignalKind};
use crate::generation::models::{ApplicantField, RequestFingerprint};
use crate::ocr::JobPosting;

/// (cue, strict). After a strict cue the name must be closed by punctuation or the end of
/// the bio: "I'm Grace, ..." names Grace, "I am Senior developer ..." names nobody.
const NAME_CUES: &[(&str, bool)] = &[
    ("my name is ", false),
    ("name: ", false),
    ("i am ", true),
    ("i'm ", true),
];
const MAX_NAME_WORDS: usize = 3;
const MAX_EXPERIENCE_SENTENCES: usize = 2;
const MAX_EXPERIENCE_WORDS: usize = 60;

const EXPERIENCE_VERBS: &[&str] = &[
    "worked",
    "working",
    "built",
    "led",
    "developed",
    "managed",
    "designed",
    "shipped",
    "delivered",
    "launched",
    "maintained",
    "interned",
    "graduated",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantProfile {
    pub raw_bio: String,
    pub has_structured_fields: bool,
    pub name: Option<String>,
    pub experience: Option<String>,
    pub skills: Vec<String>,
}

impl ApplicantProfile {
    /// Applicant fields the bio did not supply. Each must appear as its placeholder.
    pub fn missing_fields(&self) -> Vec<ApplicantField> {
        ApplicantField::ALL
            .into_iter()
            .filter(|field| match field {
                ApplicantField::Name => self.name.is_none(),
                ApplicantField::Experience => self.experience.is_none(),
                ApplicantField::Skills => self.skills.is_empty(),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub job_posting: JobPosting,
    pub applicant_profile: ApplicantProfile,
    pub fingerprint: RequestFingerprint,
}

pub fn build_request(job_posting: JobPosting, bio: &str) -> GenerationRequest {
    let applicant_profile = normalize_profile(bio);
    let fingerprint = fingerprint(job_posting.raw_text(), &applicant_profile.raw_bio);
    GenerationRequest {
        job_posting,
        applicant_profile,
        fingerprint,
    }
}

/// SHA-256 over length-prefixed job text and bio, so ("ab", "c") and ("a", "bc") differ.
pub fn fingerprint(job_text: &str, bio: &str) -> RequestFingerprint {
    let mut hasher = Sha256::new();
    for part in [job_text, bio] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    RequestFingerprint(format!("{:x}", hasher.finalize()))
}

pub fn normalize_profile(bio: &str) -> ApplicantProfile {
    let raw_bio = bio.split_whitespace().collect::<Vec<_>>().join(" ");

    let skills: Vec<String> = detect_signals(&raw_bio)
        .into_iter()
        .filter(|hit| hit.signal.kind == SignalKind::Skill)
        .map(|hit| hit.signal.label.to_string())
        .collect();
    let experience = extract_experience(&raw_bio);
    let name = extract_name(&raw_bio);

    let has_structured_fields =
        !raw_bio.is_empty() && (!skills.is_empty() || experience.is_some());

    ApplicantProfile {
        raw_bio,
        has_structured_fields,
        name,
        experience,
        skills,
    }
}

fn extract_name(bio: &str) -> Option<String> {
    let lower = bio.to_lowercase();
    for &(cue, strict) in NAME_CUES {
        let mut search_from = 0;
        while let Some(found) = lower[search_from..].find(cue) {
            let start = search_from + found;
            search_from = start + cue.len();

            // Cue must start a word: "Hi, I'm" yes, "Ai am" no.
            let at_word_start = lower[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            if !at_word_start {
                continue;
            }

            let Some(rest) = bio.get(start + cue.len()..) else {
                continue;
            };
            let mut words = Vec::new();
            let mut closed = false;
            for word in rest.split_whitespace().take(MAX_NAME_WORDS) {
                let clean = word.trim_end_matches(|c: char| matches!(c, ',' | '.' | ';' | '!'));
                if !is_name_word(clean) {
                    break;
                }
                words.push(clean);
                if clean.len() != word.len() {
                    closed = true;
                    break;
                }
            }
            if words.is_empty() {
                continue;
            }
            let at_end = rest.split_whitespace().count() == words.len();
            if !strict || closed || at_end {
                return Some(words.join(" "));
            }
        }
    }
    None
}

fn is_name_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && chars.all(|c| c.is_alphabetic() || c == '-' || c == '\'')
        && !matches!(word, "I" | "A" | "An" | "The")
        && !is_acronym(word)
        && detect_signals(word).is_empty()
}

/// "AWS", "SQL". Single capitals are initials and still count as name words.
fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() > 1 && letters.iter().all(|c| c.is_uppercase())
}

fn extract_experience(bio: &str) -> Option<String> {
    let sentences: Vec<&str> = split_sentences(bio)
        .into_iter()
        .filter(|s| has_experience_signal(s))
        .take(MAX_EXPERIENCE_SENTENCES)
        .collect();
    if sentences.is_empty() {
        return None;
    }

    let joined = sentences.join(" ");
    let words: Vec<&str> = joined.split_whitespace().take(MAX_EXPERIENCE_WORDS).collect();
    Some(words.join(" "))
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?' | '\n') {
            let next = text[idx + c.len_utf8()..].chars().next();
            if next.map_or(true, char::is_whitespace) {
                let sentence = text[start..idx + c.len_utf8()].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = idx + c.len_utf8();
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn has_experience_signal(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '+')
        .filter(|w| !w.is_empty())
        .collect();

    let years = words.windows(2).any(|pair| {
        let number = pair[0].trim_end_matches('+');
        !number.is_empty()
            && number.chars().all(|c| c.is_ascii_digit())
            && matches!(pair[1], "year" | "years" | "yrs")
    });

    years || words.iter().any(|w| EXPERIENCE_VERBS.contains(w)) || lower.contains("experience")
}
