//! Validation layer — the last gate before a result is cached or returned.
//!
//! Formatting is normalized first, then the hard rules are checked in a fixed order:
//! word budget, applicant placeholders, tip count. Running `validate` on its own output
//! returns the same result.

use crate::config::GenerationSettings;
use crate::generation::models::{count_occurrences, CoverLetter, GenerationResult, ValidationError};
use crate::generation::profile::ApplicantProfile;

pub fn validate(
    result: GenerationResult,
    profile: &ApplicantProfile,
    settings: &GenerationSettings,
) -> Result<GenerationResult, ValidationError> {
    let result = format_result(result, settings);
    let letter = &result.cover_letter;

    if letter.word_count > settings.page_word_budget {
        return Err(ValidationError::TooLong {
            words: letter.word_count,
            budget: settings.page_word_budget,
        });
    }

    for field in profile.missing_fields() {
        let token = field.placeholder();
        match count_occurrences(&letter.body, token) {
            0 => {
                return Err(ValidationError::MissingPlaceholder {
                    token: token.to_string(),
                })
            }
            1 => {}
            count => {
                return Err(ValidationError::DuplicatePlaceholder {
                    token: token.to_string(),
                    count,
                })
            }
        }
    }

    if result.tips.len() < settings.tip_min() {
        return Err(ValidationError::TooFewTips {
            count: result.tips.len(),
            minimum: settings.tip_min(),
        });
    }

    Ok(result)
}

/// Trims trailing spaces, collapses runs of blank lines, drops empty tips and
/// truncates tips to the configured maximum.
fn format_result(mut result: GenerationResult, settings: &GenerationSettings) -> GenerationResult {
    let mut body = String::with_capacity(result.cover_letter.body.len());
    let mut blank_run = 0;
    for line in result.cover_letter.body.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            body.push('\n');
        } else {
            blank_run = 0;
            body.push_str(line);
            body.push('\n');
        }
    }
    result.cover_letter = CoverLetter::from_body(body.trim().to_string());

    result.tips = std::mem::take(&mut result.tips)
        .into_iter()
        .filter_map(|mut tip| {
            tip.text = tip.text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!tip.text.is_empty()).then_some(tip)
        })
        .take(settings.tip_max())
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generator::GeneratorKind;
    use crate::generation::models::{InterviewTip, TipCategory};
    use crate::generation::profile::normalize_profile;
    use chrono::Utc;

    fn tip(text: &str) -> InterviewTip {
        InterviewTip {
            text: text.to_string(),
            category: TipCategory::Behavioral,
        }
    }

    fn result(body: &str, tips: Vec<InterviewTip>) -> GenerationResult {
        GenerationResult {
            cover_letter: CoverLetter::from_body(body.to_string()),
            tips,
            cache_hit: false,
            backend: GeneratorKind::Template,
            generated_at: Utc::now(),
        }
    }

    fn three_tips() -> Vec<InterviewTip> {
        vec![tip("One tip"), tip("Two tip"), tip("Three tip")]
    }

    const FULL_BIO: &str = "My name is Ada Lovelace. I have 5 years of Rust experience.";
    const EMPTY_LETTER: &str = "Dear Hiring Manager,\n\nI bring [Your Skills].\n\nMy experience includes [Your Experience].\n\nSincerely,\n[Your Name]";

    #[test]
    fn test_valid_result_passes_and_is_normalized() {
        let raw = result(
            "Dear Hiring Manager,   \n\n\n\nHello there.  \n\n\nSincerely,\nAda Lovelace\n\n",
            vec![tip("  Prepare   stories  "), tip(""), tip("Two"), tip("Three")],
        );
        let validated = validate(raw, &normalize_profile(FULL_BIO), &GenerationSettings::default())
            .unwrap();

        assert_eq!(
            validated.cover_letter.body,
            "Dear Hiring Manager,\n\nHello there.\n\nSincerely,\nAda Lovelace"
        );
        assert_eq!(validated.cover_letter.word_count, 8);
        let texts: Vec<&str> = validated.tips.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Prepare stories", "Two", "Three"]);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let profile = normalize_profile("");
        let settings = GenerationSettings::default();
        let once = validate(result(EMPTY_LETTER, three_tips()), &profile, &settings).unwrap();
        let twice = validate(once.clone(), &profile, &settings).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_over_budget_is_rejected() {
        let settings = GenerationSettings {
            page_word_budget: 5,
            ..GenerationSettings::default()
        };
        let err = validate(
            result("one two three four five six", three_tips()),
            &normalize_profile(FULL_BIO),
            &settings,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::TooLong { words: 6, budget: 5 });
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let body = EMPTY_LETTER.replace("[Your Name]", "Somebody");
        let err = validate(
            result(&body, three_tips()),
            &normalize_profile(""),
            &GenerationSettings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingPlaceholder {
                token: "[Your Name]".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_placeholder_is_rejected() {
        let body = format!("{EMPTY_LETTER}\n[Your Skills]");
        let err = validate(
            result(&body, three_tips()),
            &normalize_profile(""),
            &GenerationSettings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicatePlaceholder {
                token: "[Your Skills]".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_too_few_tips_is_rejected() {
        let err = validate(
            result(EMPTY_LETTER, vec![tip("One"), tip("   ")]),
            &normalize_profile(""),
            &GenerationSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::TooFewTips { count: 1, minimum: 3 });
    }

    #[test]
    fn test_tips_truncated_to_max() {
        let tips = (0..8).map(|i| tip(&format!("Tip number {i}"))).collect();
        let validated = validate(
            result(EMPTY_LETTER, tips),
            &normalize_profile(""),
            &GenerationSettings::default(),
        )
        .unwrap();
        assert_eq!(validated.tips.len(), 5);
    }
}
