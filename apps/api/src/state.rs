use std::sync::Arc;

use crate::generation::crafter::CareerCrafter;
use crate::jobs::JobSearchClient;
use crate::ocr::OcrClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub ocr: OcrClient,
    pub jobs: JobSearchClient,
    /// Owns the generator backend and the artifact cache. Shared so every request sees
    /// the same cache and in-flight table.
    pub crafter: Arc<CareerCrafter>,
}
