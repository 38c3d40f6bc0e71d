//! Artifact generators — turn a parsed posting and applicant profile into a draft
//! cover letter and unranked tip candidates.
//!
//! `TemplateGenerator` is deterministic and offline. `ModelGenerator` asks an LLM through
//! the `CompletionBackend` seam. Both feed the same ranking and validation stages in
//! `crafter`, so the backend never decides ordering or budget compliance on its own.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Config, GenerationSettings};
use crate::generation::cover_letter::compose_cover_letter;
use crate::generation::jd_parser::ParsedPosting;
use crate::generation::models::{GenerationError, TipCategory};
use crate::generation::profile::ApplicantProfile;
use crate::generation::prompts::{
    ARTIFACT_PROMPT_TEMPLATE, ARTIFACT_SYSTEM, PLACEHOLDER_INSTRUCTION,
};
use crate::generation::tips::{relevance_for_text, template_candidates, TipCandidate};
use crate::llm_client::prompts::NO_FABRICATION_INSTRUCTION;
use crate::llm_client::{strip_json_fences, CompletionBackend, LlmClient};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Template,
    Model,
}

impl FromStr for GeneratorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(GeneratorKind::Template),
            "model" | "llm" => Ok(GeneratorKind::Model),
            other => Err(anyhow!(
                "unknown GENERATOR_BACKEND '{other}' (expected 'template' or 'model')"
            )),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeneratorKind::Template => "template",
            GeneratorKind::Model => "model",
        })
    }
}

/// Everything a generator may look at. Built once per uncached request.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub job_text: String,
    pub posting: ParsedPosting,
    pub profile: ApplicantProfile,
    pub settings: GenerationSettings,
}

/// Raw generator output, before ranking and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub cover_letter: String,
    pub tips: Vec<TipCandidate>,
}

#[async_trait]
pub trait Generator: Send + Sync {
    fn kind(&self) -> GeneratorKind;

    async fn draft(&self, context: &GenerationContext) -> Result<Draft, GenerationError>;
}

pub fn build_generator(config: &Config) -> anyhow::Result<Arc<dyn Generator>> {
    match config.generator {
        GeneratorKind::Template => {
            info!("Using template artifact generator");
            Ok(Arc::new(TemplateGenerator))
        }
        GeneratorKind::Model => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the model generator")?;
            let client = LlmClient::within_deadline(api_key, config.generation.upstream_timeout())?;
            info!("Using model artifact generator ({})", crate::llm_client::MODEL);
            Ok(Arc::new(ModelGenerator::new(Arc::new(client))))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template generator
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic generator: same context in, byte-identical draft out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

#[async_trait]
impl Generator for TemplateGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Template
    }

    async fn draft(&self, context: &GenerationContext) -> Result<Draft, GenerationError> {
        Ok(Draft {
            cover_letter: compose_cover_letter(context),
            tips: template_candidates(&context.posting.signals, context.posting.company.as_deref()),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ModelArtifacts {
    cover_letter: String,
    #[serde(default)]
    interview_tips: Vec<ModelTip>,
}

#[derive(Debug, Deserialize)]
struct ModelTip {
    text: String,
    #[serde(default)]
    category: String,
}

pub struct ModelGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl ModelGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Generator for ModelGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Model
    }

    async fn draft(&self, context: &GenerationContext) -> Result<Draft, GenerationError> {
        let prompt = build_artifact_prompt(context)
            .map_err(|e| GenerationError::UpstreamModelFailure(e.to_string()))?;

        let raw = self
            .backend
            .complete(&prompt, ARTIFACT_SYSTEM)
            .await
            .map_err(|e| GenerationError::UpstreamModelFailure(e.to_string()))?;

        let artifacts: ModelArtifacts =
            serde_json::from_str(strip_json_fences(&raw)).map_err(|e| {
                warn!("Model returned malformed artifacts: {e}");
                GenerationError::UpstreamModelFailure(format!("malformed model output: {e}"))
            })?;

        if artifacts.cover_letter.trim().is_empty() {
            return Err(GenerationError::UpstreamModelFailure(
                "model returned an empty cover letter".to_string(),
            ));
        }

        let tips = artifacts
            .interview_tips
            .into_iter()
            .map(|tip| TipCandidate {
                relevance: relevance_for_text(&tip.text, &context.posting.signals),
                category: parse_category(&tip.category),
                text: tip.text,
            })
            .collect();

        Ok(Draft {
            cover_letter: artifacts.cover_letter,
            tips,
        })
    }
}

/// Unknown or missing categories rank last.
fn parse_category(raw: &str) -> TipCategory {
    let normalized: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "technical" => TipCategory::Technical,
        "companyspecific" | "company" => TipCategory::CompanySpecific,
        _ => TipCategory::Behavioral,
    }
}

fn build_artifact_prompt(context: &GenerationContext) -> anyhow::Result<String> {
    let profile = &context.profile;
    let applicant_json = serde_json::to_string_pretty(&serde_json::json!({
        "bio": profile.raw_bio,
        "name": profile.name,
        "experience": profile.experience,
        "skills": profile.skills,
    }))?;
    let keywords_json = serde_json::to_string(&context.posting.keyword_labels())?;

    let missing: Vec<&str> = profile
        .missing_fields()
        .into_iter()
        .map(|field| field.placeholder())
        .collect();
    let placeholder_instruction = if missing.is_empty() {
        "The applicant profile is complete. Do not use bracketed placeholders for applicant details."
            .to_string()
    } else {
        fill_template(
            PLACEHOLDER_INSTRUCTION,
            &[("missing_placeholders", missing.join(", ").as_str())],
        )
    };

    let word_budget = context.settings.page_word_budget.to_string();
    let tip_min = context.settings.tip_min().to_string();
    let tip_max = context.settings.tip_max().to_string();

    Ok(fill_template(
        ARTIFACT_PROMPT_TEMPLATE,
        &[
            ("no_fabrication_instruction", NO_FABRICATION_INSTRUCTION),
            ("placeholder_instruction", placeholder_instruction.as_str()),
            ("job_text", context.job_text.as_str()),
            (
                "role_title",
                context.posting.role_title.as_deref().unwrap_or("unknown"),
            ),
            (
                "company",
                context.posting.company.as_deref().unwrap_or("unknown"),
            ),
            ("keywords_json", keywords_json.as_str()),
            ("applicant_json", applicant_json.as_str()),
            ("word_budget", word_budget.as_str()),
            ("tip_min", tip_min.as_str()),
            ("tip_max", tip_max.as_str()),
        ],
    ))
}

/// Fills `{slot}` markers in a single pass. Inserted values are never rescanned, so job or
/// bio text that contains a slot name stays literal. Unknown markers are left as written.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let key_len = after
            .find(|c: char| !(c.is_ascii_lowercase() || c == '_'))
            .unwrap_or(after.len());
        let key = &after[..key_len];
        let value = after[key_len..]
            .starts_with('}')
            .then(|| slots.iter().find(|(slot, _)| *slot == key))
            .flatten();
        match value {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[key_len + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
