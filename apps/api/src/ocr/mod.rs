// OCR: fetches job-posting text from OCR.space and turns it into a clean `JobPosting`.
// The client owns transport retries; the extraction adapter owns failure classification.

pub mod client;
pub mod extraction;

pub use client::OcrClient;
pub use extraction::{extract_job_posting, ExtractionError, JobPosting, OcrPayload};
