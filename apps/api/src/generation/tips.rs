//! Interview-tip synthesis and ranking.
//!
//! Ranking: category priority (Technical > CompanySpecific > Behavioral), then relevance
//! descending, then candidate order. Near-duplicates (token-set Jaccard ≥ 0.8) are dropped
//! in favour of the higher-ranked tip. Short lists are padded from `FALLBACK_TIPS`.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::generation::lexicon::{count_bounded, SignalHit};
use crate::generation::models::{InterviewTip, TipCategory};

pub const DUPLICATE_THRESHOLD: f64 = 0.8;

/// Largest tip count the fallbacks can always satisfy.
pub const MAX_TIP_COUNT: usize = FALLBACK_TIPS.len();

/// Used only when ranking leaves fewer tips than the configured minimum.
const FALLBACK_TIPS: &[(&str, TipCategory)] = &[
    (
        "Research the company's recent news, products, and competitors so you can explain why you want this role there.",
        TipCategory::CompanySpecific,
    ),
    (
        "Prepare two or three STAR stories (situation, task, action, result) that show the impact of your work.",
        TipCategory::Behavioral,
    ),
    (
        "Prepare thoughtful questions for the interviewer about the team, its current challenges, and how success is measured.",
        TipCategory::Behavioral,
    ),
    (
        "Re-read the job posting the day before and map each listed requirement to an example from your background.",
        TipCategory::Behavioral,
    ),
    (
        "Practice a two-minute introduction that connects your background to this specific role.",
        TipCategory::Behavioral,
    ),
];

/// An unranked tip produced by a generator backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TipCandidate {
    pub text: String,
    pub category: TipCategory,
    /// Keyword-match count; higher ranks first within a category.
    pub relevance: usize,
}

/// One candidate per detected signal, plus a company-research tip when the employer is known.
pub fn template_candidates(signals: &[SignalHit], company: Option<&str>) -> Vec<TipCandidate> {
    let mut candidates: Vec<TipCandidate> = signals
        .iter()
        .map(|hit| TipCandidate {
            text: hit.signal.tip.to_string(),
            category: hit.signal.category,
            relevance: hit.count,
        })
        .collect();

    if let Some(company) = company {
        candidates.push(TipCandidate {
            text: format!(
                "Research {company}'s recent news, products, and competitors so you can explain why you want to work there specifically."
            ),
            category: TipCategory::CompanySpecific,
            relevance: 1,
        });
    }

    candidates
}

/// Number of detected signals a free-text tip mentions.
pub fn relevance_for_text(text: &str, signals: &[SignalHit]) -> usize {
    let lower = text.to_lowercase();
    signals
        .iter()
        .filter(|hit| {
            hit.signal
                .terms
                .iter()
                .any(|term| count_bounded(&lower, term) > 0)
        })
        .count()
}

pub fn rank_tips(candidates: Vec<TipCandidate>, (min, max): (usize, usize)) -> Vec<InterviewTip> {
    let mut ordered: Vec<(usize, TipCandidate)> = candidates
        .into_iter()
        .map(|c| TipCandidate {
            text: c.text.trim().to_string(),
            ..c
        })
        .filter(|c| !c.text.is_empty())
        .enumerate()
        .collect();
    ordered.sort_by_key(|(idx, c)| (c.category.priority(), Reverse(c.relevance), *idx));

    let mut kept: Vec<InterviewTip> = Vec::new();
    let mut kept_tokens: Vec<HashSet<String>> = Vec::new();

    let mut offer = |text: String, category: TipCategory, kept: &mut Vec<InterviewTip>| {
        let tokens = token_set(&text);
        if kept_tokens
            .iter()
            .any(|existing| jaccard(existing, &tokens) >= DUPLICATE_THRESHOLD)
        {
            return;
        }
        kept_tokens.push(tokens);
        kept.push(InterviewTip { text, category });
    };

    for (_, candidate) in ordered {
        if kept.len() == max {
            break;
        }
        offer(candidate.text, candidate.category, &mut kept);
    }

    for (text, category) in FALLBACK_TIPS {
        if kept.len() >= min {
            break;
        }
        offer(text.to_string(), *category, &mut kept);
    }

    // Fallbacks were appended last; restore category order (stable).
    kept.sort_by_key(|tip| tip.category.priority());
    kept
}

pub fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
