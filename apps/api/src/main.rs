use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tailor::config::Config;
use tailor::llm_client::{self, LlmClient};
use tailor::optimization::GeminiOptimizer;
use tailor::routes::build_router;
use tailor::session::orchestrator::BatchOrchestrator;
use tailor::session::store::SessionStore;
use tailor::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.request_timeout_secs)?;
    if llm.is_configured() {
        info!(
            "LLM client initialized (model: {}, timeout: {}s)",
            llm_client::MODEL,
            config.request_timeout_secs
        );
    } else {
        warn!("GEMINI_API_KEY is not set; every optimization will fail until it is configured");
    }

    // Session store + orchestrator
    let session = SessionStore::new();
    let orchestrator = BatchOrchestrator::new(session.clone(), Arc::new(GeminiOptimizer::new(llm)));

    let state = AppState {
        session,
        orchestrator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict to the frontend origin once it has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
