//! JD Parser — pulls the role title, company name and lexicon signals out of job text.
//!
//! Purely heuristic and deterministic. Anything it cannot find is left as `None` and the
//! cover letter falls back to a bracketed placeholder.

use crate::generation::lexicon::{detect_signals, SignalHit};

const ROLE_NOUNS: &[&str] = &[
    "engineer",
    "developer",
    "designer",
    "manager",
    "analyst",
    "scientist",
    "architect",
    "specialist",
    "consultant",
    "administrator",
    "coordinator",
    "intern",
    "programmer",
];

const TITLE_PREFIXES: &[&str] = &[
    "job title:",
    "position:",
    "role:",
    "title:",
    "we're hiring:",
    "we are hiring:",
    "hiring:",
];

/// Words that follow "About"/"Join" but are not a company name.
const NOT_A_COMPANY: &[&str] = &["Us", "The", "This", "You", "Our", "Your", "A", "An", "Role", "Position", "Team"];

const MAX_TITLE_WORDS: usize = 10;
const MAX_COMPANY_WORDS: usize = 4;
const HEADER_LINES: usize = 8;

#[derive(Debug, Clone)]
pub struct ParsedPosting {
    pub role_title: Option<String>,
    pub company: Option<String>,
    pub signals: Vec<SignalHit>,
}

impl ParsedPosting {
    /// Labels of the detected signals, in lexicon order.
    pub fn keyword_labels(&self) -> Vec<&'static str> {
        self.signals.iter().map(|h| h.signal.label).collect()
    }
}

pub fn parse_posting(text: &str) -> ParsedPosting {
    ParsedPosting {
        role_title: detect_role_title(text),
        company: detect_company(text),
        signals: detect_signals(text),
    }
}

pub fn detect_role_title(text: &str) -> Option<String> {
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()).take(HEADER_LINES) {
        let candidate = strip_title_prefix(line);
        let candidate = cut_at_company_separator(candidate);
        let words: Vec<&str> = candidate.split_whitespace().collect();
        if words.is_empty() || words.len() > MAX_TITLE_WORDS {
            continue;
        }
        if words.iter().any(|w| is_role_noun(w)) {
            return Some(trim_punctuation(candidate).to_string());
        }
    }

    title_after_looking_for(text)
}

pub fn detect_company(text: &str) -> Option<String> {
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        for prefix in ["company name:", "company:", "employer:"] {
            if lower.starts_with(prefix) {
                if let Some(name) = line.get(prefix.len()..).and_then(labelled_name) {
                    return Some(name);
                }
            }
        }

        for prefix in ["about ", "join "] {
            if lower.starts_with(prefix) {
                if let Some(name) = line.get(prefix.len()..).and_then(capitalized_run) {
                    return Some(name);
                }
            }
        }

        if let Some(idx) = lower.find(" is hiring").or_else(|| lower.find(" is looking for")) {
            let before: Vec<&str> = line.get(..idx).unwrap_or("").split_whitespace().collect();
            let start = before.len().saturating_sub(MAX_COMPANY_WORDS);
            let tail: Vec<&str> = before[start..]
                .iter()
                .rev()
                .take_while(|w| is_capitalized(w))
                .copied()
                .collect();
            if !tail.is_empty() {
                let name: Vec<&str> = tail.into_iter().rev().collect();
                let name = name.join(" ");
                if !NOT_A_COMPANY.contains(&name.as_str()) {
                    return Some(trim_punctuation(&name).to_string());
                }
            }
        }
    }

    // "Senior Engineer at Acme Corp" in the header
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()).take(HEADER_LINES) {
        if let Some(idx) = line.find(" at ") {
            if let Some(name) = capitalized_run(&line[idx + 4..]) {
                return Some(name);
            }
        }
    }

    None
}

fn strip_title_prefix(line: &str) -> &str {
    let lower = line.to_lowercase();
    for prefix in TITLE_PREFIXES {
        if lower.starts_with(prefix) {
            return line.get(prefix.len()..).unwrap_or(line).trim();
        }
    }
    line
}

fn cut_at_company_separator(line: &str) -> &str {
    let mut end = line.len();
    for sep in [" at ", " - ", " — ", " | ", " @ "] {
        if let Some(idx) = line.find(sep) {
            end = end.min(idx);
        }
    }
    line[..end].trim()
}

/// "We are looking for a Senior Rust Engineer to join..." → "Senior Rust Engineer".
fn title_after_looking_for(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let idx = lower.find("looking for ")?;
    let rest = text.get(idx + "looking for ".len()..)?;
    let mut words = rest.split_whitespace().peekable();
    if let Some(first) = words.peek() {
        if matches!(first.to_lowercase().as_str(), "a" | "an" | "the") {
            words.next();
        }
    }

    let mut title = Vec::new();
    for word in words.take(6) {
        title.push(word);
        if is_role_noun(word) {
            return Some(trim_punctuation(&title.join(" ")).to_string());
        }
    }
    None
}

/// Value after a "Company:" label, up to the first clause break and at most
/// `MAX_COMPANY_WORDS` words. OCR often runs the rest of the posting onto the same line.
fn labelled_name(text: &str) -> Option<String> {
    let mut name = Vec::new();
    for word in text.split_whitespace().take(MAX_COMPANY_WORDS) {
        let ends_clause = word.ends_with(['.', ',', ':', ';', '!', '?', '|']);
        let clean = trim_punctuation(word);
        if !clean.is_empty() {
            name.push(clean);
        }
        if ends_clause {
            break;
        }
    }
    (!name.is_empty()).then(|| name.join(" "))
}

/// Leading run of capitalized words, e.g. "Acme Corp, a fintech startup" → "Acme Corp".
fn capitalized_run(text: &str) -> Option<String> {
    let mut name = Vec::new();
    for word in text.split_whitespace().take(MAX_COMPANY_WORDS) {
        if !is_capitalized(word) {
            break;
        }
        let ends_clause = word.ends_with(['.', ',', ':', ';', '!', '?']);
        name.push(trim_punctuation(word));
        if ends_clause {
            break;
        }
    }

    let name = name.join(" ");
    if name.is_empty() || NOT_A_COMPANY.contains(&name.split(' ').next().unwrap_or("")) {
        return None;
    }
    Some(name)
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_role_noun(word: &str) -> bool {
    let word = trim_punctuation(word).to_lowercase();
    let singular = word.strip_suffix('s').unwrap_or(&word);
    ROLE_NOUNS.contains(&word.as_str()) || ROLE_NOUNS.contains(&singular)
}

fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ',' | ':' | ';' | '!' | '?' | '.' | '(' | ')' | '"'))
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_header_with_company() {
        let text = "Senior Backend Engineer at Acme Corp\n\nWe build payments.";
        assert_eq!(detect_role_title(text).as_deref(), Some("Senior Backend Engineer"));
        assert_eq!(detect_company(text).as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn test_title_with_prefix() {
        let text = "Job Title: WordPress Developer\nLocation: Remote";
        assert_eq!(detect_role_title(text).as_deref(), Some("WordPress Developer"));
    }

    #[test]
    fn test_title_from_looking_for_sentence() {
        let text = "Our growing team is looking for a Senior Rust Engineer to join us and help scale our platform across many regions and markets.";
        assert_eq!(detect_role_title(text).as_deref(), Some("Senior Rust Engineer"));
    }

    #[test]
    fn test_no_title_without_role_noun() {
        assert_eq!(detect_role_title("Great opportunity\nApply today"), None);
    }

    #[test]
    fn test_company_from_about_line() {
        let text = "Data Analyst\nAbout Globex Corporation, a retail leader";
        assert_eq!(detect_company(text).as_deref(), Some("Globex Corporation"));
    }

    #[test]
    fn test_about_us_is_not_a_company() {
        assert_eq!(detect_company("About Us\nWe make things."), None);
    }

    #[test]
    fn test_company_is_hiring() {
        let text = "Initech is hiring a Java developer.";
        assert_eq!(detect_company(text).as_deref(), Some("Initech"));
    }

    #[test]
    fn test_company_prefix_line() {
        let text = "Company: Umbrella Health\nRole: Analyst";
        assert_eq!(detect_company(text).as_deref(), Some("Umbrella Health"));
    }

    #[test]
    fn test_company_label_on_run_on_line_is_bounded() {
        let text = format!(
            "Company: Acme Corp. {}",
            "We build payment tools for small businesses on AWS with Docker. ".repeat(15)
        );
        assert_eq!(detect_company(&text).as_deref(), Some("Acme Corp"));

        let text = "Employer: Very Long Holding Company Name Group International";
        assert_eq!(
            detect_company(text).as_deref(),
            Some("Very Long Holding Company")
        );
    }

    #[test]
    fn test_parse_posting_collects_signals() {
        let parsed = parse_posting("Rust Engineer at Acme\nWe use Docker and Kubernetes.");
        assert_eq!(parsed.role_title.as_deref(), Some("Rust Engineer"));
        assert_eq!(parsed.company.as_deref(), Some("Acme"));
        assert_eq!(
            parsed.keyword_labels(),
            vec!["Rust", "Docker", "Kubernetes", "engineer"]
        );
    }
}
