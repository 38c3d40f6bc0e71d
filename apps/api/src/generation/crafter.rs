//! CareerCrafter — orchestrates artifact generation for one normalized request.
//!
//! Flow: cache lookup → parse posting → generator draft (under the upstream timeout) →
//!       rank tips → validate → cache → return.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GenerationSettings;
use crate::generation::cache::ArtifactCache;
use crate::generation::generator::{GenerationContext, Generator, GeneratorKind};
use crate::generation::jd_parser::parse_posting;
use crate::generation::models::{CoverLetter, GenerationError, GenerationResult, ValidationError};
use crate::generation::profile::GenerationRequest;
use crate::generation::tips::rank_tips;
use crate::generation::validation::validate;

/// Fewer recognizable keywords than this and the posting is not worth drafting against.
pub const MIN_KEYWORDS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("generated artifacts failed validation: {0}")]
    Validation(#[from] ValidationError),
}

pub struct CareerCrafter {
    generator: Arc<dyn Generator>,
    cache: ArtifactCache,
    settings: GenerationSettings,
}

impl CareerCrafter {
    pub fn new(generator: Arc<dyn Generator>, settings: GenerationSettings) -> Self {
        Self {
            generator,
            cache: ArtifactCache::new(settings.cache_capacity),
            settings,
        }
    }

    pub fn backend(&self) -> GeneratorKind {
        self.generator.kind()
    }

    /// Cached, single-flight generation. Identical concurrent requests share one draft.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, CraftError> {
        self.cache
            .get_or_generate(&request.fingerprint, || self.generate_uncached(request))
            .await
    }

    /// Runs the generator and validation without touching the cache.
    pub async fn generate_uncached(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, CraftError> {
        let job_text = request.job_posting.raw_text();
        let posting = parse_posting(job_text);

        let keywords_found = posting.signals.len();
        if keywords_found < MIN_KEYWORDS {
            info!(
                "Request {}: only {} keywords in posting, refusing to draft",
                request.fingerprint, keywords_found
            );
            return Err(GenerationError::TemplateMismatch { keywords_found }.into());
        }

        let context = GenerationContext {
            job_text: job_text.to_string(),
            posting,
            profile: request.applicant_profile.clone(),
            settings: self.settings.clone(),
        };

        let timeout = self.settings.upstream_timeout();
        let draft = tokio::time::timeout(timeout, self.generator.draft(&context))
            .await
            .map_err(|_| {
                warn!(
                    "Request {}: {} generator timed out after {}ms",
                    request.fingerprint,
                    self.generator.kind(),
                    timeout.as_millis()
                );
                GenerationError::UpstreamModelFailure(format!(
                    "generator timed out after {}ms",
                    timeout.as_millis()
                ))
            })??;

        let result = GenerationResult {
            cover_letter: CoverLetter::from_body(draft.cover_letter),
            tips: rank_tips(draft.tips, self.settings.tip_count_range),
            cache_hit: false,
            backend: self.generator.kind(),
            generated_at: Utc::now(),
        };

        let result = validate(result, &context.profile, &self.settings).map_err(|e| {
            warn!("Request {}: artifacts rejected: {e}", request.fingerprint);
            e
        })?;

        info!(
            "Request {}: generated {}-word cover letter and {} tips ({} backend)",
            request.fingerprint,
            result.cover_letter.word_count,
            result.tips.len(),
            result.backend
        );

        Ok(result)
    }
}
