mod config;
mod errors;
mod generation;
mod jobs;
mod llm_client;
mod ocr;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::crafter::CareerCrafter;
use crate::generation::generator::build_generator;
use crate::jobs::JobSearchClient;
use crate::ocr::OcrClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerCrafter API v{}", env!("CARGO_PKG_VERSION"));

    let upstream_timeout = config.generation.upstream_timeout();

    // OCR.space client
    let ocr = OcrClient::new(
        config.ocr_api_key.clone(),
        config.ocr_api_url.clone(),
        upstream_timeout,
    )?;
    info!("OCR client initialized ({})", config.ocr_api_url);

    // Findwork client (key is checked per call)
    let jobs = JobSearchClient::new(
        config.findwork_api_key.clone(),
        config.findwork_api_url.clone(),
        upstream_timeout,
    )?;
    if config.findwork_api_key.is_none() {
        info!("FINDWORK_API_KEY not set; get-job tool will return a configuration error");
    }

    // Generator backend + artifact cache
    let generator = build_generator(&config)?;
    let crafter = Arc::new(CareerCrafter::new(generator, config.generation.clone()));
    info!(
        "Artifact generator ready: backend={}, budget={} words, tips={}..={}, cache={}",
        crafter.backend(),
        config.generation.page_word_budget,
        config.generation.tip_min(),
        config.generation.tip_max(),
        config.generation.cache_capacity
    );

    let state = AppState {
        ocr,
        jobs,
        crafter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
