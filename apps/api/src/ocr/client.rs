//! OCR.space client — the only code that talks to the OCR service.
//!
//! Transient failures (transport errors, timeouts, 429, 5xx) are retried with exponential
//! backoff. A response that reports `IsErroredOnProcessing` is a definitive answer and is
//! never retried.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ocr::extraction::{ExtractionError, OcrPayload};

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);
const OCR_LANGUAGE: &str = "eng";

/// Subset of the OCR.space `parse/imageurl` response we rely on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    is_errored_on_processing: bool,
    /// OCR.space sends either a string or an array of strings here.
    #[serde(default)]
    error_message: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl OcrSpaceResponse {
    fn into_payload(self) -> OcrPayload {
        if self.is_errored_on_processing {
            return OcrPayload {
                text: String::new(),
                success: false,
                error_message: flatten_error_message(&self.error_message),
            };
        }

        OcrPayload {
            text: self
                .parsed_results
                .into_iter()
                .next()
                .map(|r| r.parsed_text)
                .unwrap_or_default(),
            success: true,
            error_message: None,
        }
    }
}

fn flatten_error_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[derive(Clone)]
pub struct OcrClient {
    client: Client,
    api_key: String,
    endpoint: String,
    backoff: Duration,
}

impl OcrClient {
    pub fn new(api_key: String, endpoint: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Overrides the base retry delay (doubles per attempt).
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Runs OCR on the image at `image_url`.
    ///
    /// Returns a payload with `success = false` when OCR.space reports a processing error;
    /// the extraction adapter classifies that. Transport-level failures that survive all
    /// retries surface as `ExtractionError::ServiceFailure`.
    pub async fn parse_image_url(&self, image_url: &str) -> Result<OcrPayload, ExtractionError> {
        let mut last_error = String::from("OCR request was never attempted");

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "OCR attempt {} failed ({}), retrying after {}ms...",
                    attempt,
                    last_error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .query(&[
                    ("apikey", self.api_key.as_str()),
                    ("url", image_url),
                    ("language", OCR_LANGUAGE),
                ])
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = if e.is_timeout() {
                        "OCR request timed out".to_string()
                    } else {
                        format!("OCR request failed: {e}")
                    };
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("OCR service returned {status}: {body}");
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ExtractionError::ServiceFailure(format!(
                    "OCR service returned {status}: {body}"
                )));
            }

            let parsed: OcrSpaceResponse = response.json().await.map_err(|e| {
                ExtractionError::ServiceFailure(format!("OCR response could not be parsed: {e}"))
            })?;

            debug!(
                "OCR call succeeded: errored={}, results={}",
                parsed.is_errored_on_processing,
                parsed.parsed_results.len()
            );

            return Ok(parsed.into_payload());
        }

        Err(ExtractionError::ServiceFailure(format!(
            "{last_error} (after {MAX_ATTEMPTS} attempts)"
        )))
    }
}
