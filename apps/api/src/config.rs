use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::generation::generator::GeneratorKind;
use crate::generation::tips::MAX_TIP_COUNT;

/// Smallest budget that still fits every essential cover-letter paragraph.
pub const MIN_PAGE_WORD_BUDGET: usize = 150;

const DEFAULT_OCR_API_URL: &str = "https://api.ocr.space/parse/imageurl";
const DEFAULT_FINDWORK_API_URL: &str = "https://findwork.dev/api/jobs/";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or inconsistent.
#[derive(Debug, Clone)]
pub struct Config {
    pub ocr_api_key: String,
    pub ocr_api_url: String,
    /// Only needed by the get-job tool; checked when the tool is called.
    pub findwork_api_key: Option<String>,
    pub findwork_api_url: String,
    /// Required when `generator` is `GeneratorKind::Model`.
    pub anthropic_api_key: Option<String>,
    pub generator: GeneratorKind,
    pub generation: GenerationSettings,
    pub port: u16,
    pub rust_log: String,
}

/// Knobs shared by every stage of the artifact pipeline.
/// Passed explicitly to each component at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub page_word_budget: usize,
    /// Inclusive (min, max) number of interview tips.
    pub tip_count_range: (usize, usize),
    pub cache_capacity: usize,
    pub upstream_timeout_ms: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            page_word_budget: 500,
            tip_count_range: (3, 5),
            cache_capacity: 1000,
            upstream_timeout_ms: 10_000,
        }
    }
}

impl GenerationSettings {
    pub fn tip_min(&self) -> usize {
        self.tip_count_range.0
    }

    pub fn tip_max(&self) -> usize {
        self.tip_count_range.1
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.tip_count_range;
        if min == 0 {
            bail!("TIP_COUNT_MIN must be at least 1");
        }
        if min > max {
            bail!("TIP_COUNT_MIN ({min}) must not exceed TIP_COUNT_MAX ({max})");
        }
        if max > MAX_TIP_COUNT {
            bail!("TIP_COUNT_MAX ({max}) must not exceed {MAX_TIP_COUNT}");
        }
        if self.cache_capacity == 0 {
            bail!("CACHE_CAPACITY must be at least 1");
        }
        if self.page_word_budget < MIN_PAGE_WORD_BUDGET {
            bail!(
                "PAGE_WORD_BUDGET ({}) must be at least {MIN_PAGE_WORD_BUDGET}",
                self.page_word_budget
            );
        }
        if self.upstream_timeout_ms == 0 {
            bail!("UPSTREAM_TIMEOUT_MS must be at least 1");
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = GenerationSettings::default();
        let generation = GenerationSettings {
            page_word_budget: parse_env("PAGE_WORD_BUDGET", defaults.page_word_budget)?,
            tip_count_range: (
                parse_env("TIP_COUNT_MIN", defaults.tip_min())?,
                parse_env("TIP_COUNT_MAX", defaults.tip_max())?,
            ),
            cache_capacity: parse_env("CACHE_CAPACITY", defaults.cache_capacity)?,
            upstream_timeout_ms: parse_env("UPSTREAM_TIMEOUT_MS", defaults.upstream_timeout_ms)?,
        };
        generation.validate()?;

        let generator = match optional_env("GENERATOR_BACKEND") {
            Some(raw) => raw.parse::<GeneratorKind>()?,
            None => GeneratorKind::Template,
        };

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        if generator == GeneratorKind::Model && anthropic_api_key.is_none() {
            bail!("GENERATOR_BACKEND=model requires ANTHROPIC_API_KEY to be set");
        }

        Ok(Config {
            ocr_api_key: require_env("OCR_APIKEY")?,
            ocr_api_url: optional_env("OCR_API_URL")
                .unwrap_or_else(|| DEFAULT_OCR_API_URL.to_string()),
            findwork_api_key: optional_env("FINDWORK_API_KEY"),
            findwork_api_url: optional_env("FINDWORK_API_URL")
                .unwrap_or_else(|| DEFAULT_FINDWORK_API_URL.to_string()),
            anthropic_api_key,
            generator,
            generation,
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
