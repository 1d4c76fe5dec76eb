//! HTTP surface for the rotation dashboard.

pub mod config;
pub mod error;
pub mod rrg_routes;

pub use error::{ApiResponse, AppError};

use axum::{routing::get, Json, Router};
use insight_client::GeminiClient;
use rotation_graph::standard_sectors;
use rotation_orchestrator::RotationOrchestrator;
use rrg_core::NarrativeSummarizer;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use yahoo_client::YahooFinanceClient;

use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RotationOrchestrator>,
    pub summarizer: Arc<dyn NarrativeSummarizer>,
}

impl AppState {
    pub fn new(orchestrator: RotationOrchestrator, summarizer: Arc<dyn NarrativeSummarizer>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            summarizer,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(rrg_routes::rrg_routes())
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Text logs by default, JSON when `RUST_LOG_FORMAT=json`
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting RRG server");
    tracing::info!("  Benchmark: {}", config.benchmark);
    tracing::info!("  Chart source: {}", config.yahoo.base_url);
    if let Some(proxy) = &config.yahoo.proxy_url {
        tracing::info!("  CORS proxy: {}", proxy);
    }

    let provider = Arc::new(YahooFinanceClient::with_config(config.yahoo.clone()));
    let orchestrator =
        RotationOrchestrator::with_universe(provider, &config.benchmark, standard_sectors());

    let summarizer = GeminiClient::new(config.gemini.clone());
    if summarizer.is_enabled() {
        tracing::info!("  Market insights: {}", config.gemini.model);
    } else {
        tracing::warn!("No Gemini API key configured, market insights disabled");
    }

    let app = build_router(AppState::new(orchestrator, Arc::new(summarizer)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("RRG server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}
