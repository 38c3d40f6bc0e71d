//! Template cover-letter composition.
//!
//! Essential paragraphs are always emitted. Optional paragraphs are added in document order
//! only while the letter stays within the page word budget. Applicant facts come from the
//! profile verbatim; every missing applicant field is written as its placeholder exactly once.

use crate::generation::generator::GenerationContext;
use crate::generation::lexicon::SignalKind;
use crate::generation::models::{
    count_words, ApplicantField, COMPANY_PLACEHOLDER, POSITION_PLACEHOLDER,
};

const MAX_LISTED_SKILLS: usize = 5;
const MAX_LISTED_KEYWORDS: usize = 4;
const EXPERIENCE_LEAD: &str = "A brief summary of my background:";

struct Paragraph {
    text: String,
    essential: bool,
}

impl Paragraph {
    fn essential(text: String) -> Self {
        Self {
            text,
            essential: true,
        }
    }

    fn optional(text: String) -> Self {
        Self {
            text,
            essential: false,
        }
    }
}

pub fn compose_cover_letter(context: &GenerationContext) -> String {
    let role = context
        .posting
        .role_title
        .as_deref()
        .unwrap_or(POSITION_PLACEHOLDER);
    let company = context.posting.company.as_deref();
    let profile = &context.profile;

    let mut paragraphs = vec![Paragraph::essential("Dear Hiring Manager,".to_string())];

    paragraphs.push(Paragraph::essential(format!(
        "I am writing to apply for the {role} position at {}. {}",
        company.unwrap_or(COMPANY_PLACEHOLDER),
        skills_sentence(context)
    )));

    // A real experience summary is filled in below, once the rest of the essential text is known.
    let experience_slot = paragraphs.len();
    paragraphs.push(Paragraph::essential(match profile.experience {
        Some(_) => String::new(),
        None => format!(
            "My relevant experience includes {}.",
            ApplicantField::Experience.placeholder()
        ),
    }));

    if let Some(alignment) = alignment_paragraph(context) {
        paragraphs.push(Paragraph::optional(alignment));
    }

    if let Some(company_paragraph) = company_paragraph(context) {
        paragraphs.push(Paragraph::optional(company_paragraph));
    }

    paragraphs.push(Paragraph::essential(format!(
        "Thank you for considering my application. I would welcome the opportunity to discuss how I can contribute to {}.",
        company.unwrap_or("your team")
    )));

    paragraphs.push(Paragraph::essential(format!(
        "Sincerely,\n{}",
        profile
            .name
            .as_deref()
            .unwrap_or(ApplicantField::Name.placeholder())
    )));

    let budget = context.settings.page_word_budget;
    if let Some(experience) = profile.experience.as_deref() {
        let fixed_words: usize = paragraphs
            .iter()
            .filter(|p| p.essential)
            .map(|p| count_words(&p.text))
            .sum();
        paragraphs[experience_slot].text =
            experience_paragraph(experience, budget.saturating_sub(fixed_words));
    }

    fit_to_budget(paragraphs, budget)
}

/// The experience paragraph, shortened so the essential text never exceeds `available` words.
fn experience_paragraph(experience: &str, available: usize) -> String {
    let keep = available.saturating_sub(count_words(EXPERIENCE_LEAD));
    let words: Vec<&str> = experience.split_whitespace().take(keep).collect();
    if words.is_empty() {
        return String::new();
    }
    format!("{EXPERIENCE_LEAD} {}", words.join(" "))
}

fn skills_sentence(context: &GenerationContext) -> String {
    let skills = &context.profile.skills;
    if skills.is_empty() {
        return format!(
            "I bring {} to this role.",
            ApplicantField::Skills.placeholder()
        );
    }

    let job_skills: Vec<&str> = context
        .posting
        .signals
        .iter()
        .filter(|hit| hit.signal.kind == SignalKind::Skill)
        .map(|hit| hit.signal.label)
        .collect();
    let matched: Vec<&str> = job_skills
        .iter()
        .copied()
        .filter(|label| skills.iter().any(|s| s == label))
        .take(MAX_LISTED_SKILLS)
        .collect();

    if matched.is_empty() {
        let listed: Vec<&str> = skills
            .iter()
            .map(String::as_str)
            .take(MAX_LISTED_SKILLS)
            .collect();
        format!("I bring hands-on experience with {}.", join_list(&listed))
    } else {
        format!(
            "My background in {} matches what your team is looking for.",
            join_list(&matched)
        )
    }
}

/// Restates what the posting emphasizes. Makes no claims about the applicant.
fn alignment_paragraph(context: &GenerationContext) -> Option<String> {
    let mut hits: Vec<_> = context
        .posting
        .signals
        .iter()
        .filter(|hit| matches!(hit.signal.kind, SignalKind::Skill | SignalKind::Trait))
        .collect();
    if hits.is_empty() {
        return None;
    }
    hits.sort_by_key(|hit| (std::cmp::Reverse(hit.count), hit.lexicon_index));
    let labels: Vec<&str> = hits
        .iter()
        .take(MAX_LISTED_KEYWORDS)
        .map(|hit| hit.signal.label)
        .collect();

    Some(format!(
        "Your posting emphasizes {}. These are the areas I am most eager to focus on, and I am ready to apply them to the challenges your team is tackling.",
        join_list(&labels)
    ))
}

fn company_paragraph(context: &GenerationContext) -> Option<String> {
    let focus: Vec<&str> = context
        .posting
        .signals
        .iter()
        .filter(|hit| hit.signal.kind == SignalKind::Company)
        .take(MAX_LISTED_KEYWORDS)
        .map(|hit| hit.signal.label)
        .collect();

    match (context.posting.company.as_deref(), focus.is_empty()) {
        (Some(company), false) => Some(format!(
            "I am particularly drawn to {company}'s focus on {}.",
            join_list(&focus)
        )),
        (None, false) => Some(format!(
            "I am particularly drawn to your organization's focus on {}.",
            join_list(&focus)
        )),
        (Some(company), true) => Some(format!(
            "I am excited by the prospect of contributing to the work {company} is doing."
        )),
        (None, true) => None,
    }
}

fn fit_to_budget(paragraphs: Vec<Paragraph>, budget: usize) -> String {
    let mut used: usize = paragraphs
        .iter()
        .filter(|p| p.essential)
        .map(|p| count_words(&p.text))
        .sum();

    let mut kept = Vec::with_capacity(paragraphs.len());
    for paragraph in paragraphs {
        if paragraph.text.is_empty() {
            continue;
        }
        if paragraph.essential {
            kept.push(paragraph.text);
            continue;
        }
        let words = count_words(&paragraph.text);
        if used + words <= budget {
            used += words;
            kept.push(paragraph.text);
        }
    }

    kept.join("\n\n")
}

/// "a", "a and b", "a, b, and c".
fn join_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => one.to_string(),
        [a, b] => format!("{a} and {b}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}
