// Job search: looks up open positions on Findwork by skills, location and remote status.
// The handler lives in handlers.rs; this file owns the upstream client and wire types.

pub mod handlers;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("Missing FINDWORK_API_KEY environment variable")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Findwork API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Findwork reports company size as a number, a range string ("11-50"), or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeCount {
    Exact(u64),
    Range(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_num_employees: Option<EmployeeCount>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSearchResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<JobListing>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub skills: String,
    pub location: String,
    pub remote: bool,
}

impl JobQuery {
    /// Query-string pairs. A search with no location is always a remote search.
    fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        let skills = self.skills.trim();
        let location = self.location.trim();
        if !skills.is_empty() {
            params.push(("search", skills));
        }
        if !location.is_empty() {
            params.push(("location", location));
        }
        if self.remote || location.is_empty() {
            params.push(("remote", "true"));
        }
        params
    }
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl JobSearchClient {
    pub fn new(
        api_key: Option<String>,
        endpoint: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint,
        })
    }

    pub async fn search(&self, query: &JobQuery) -> Result<JobSearchResponse, JobSearchError> {
        let api_key = self.api_key.as_deref().ok_or(JobSearchError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("Token {api_key}"))
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let jobs: JobSearchResponse = response.json().await?;
        debug!(
            "Findwork returned {} of {} listings",
            jobs.results.len(),
            jobs.count
        );
        Ok(jobs)
    }
}
