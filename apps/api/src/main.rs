mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod training;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::inflight::InFlightRegistry;
use crate::llm_client::transport::ReqwestTransport;
use crate::llm_client::{DispatchSettings, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, ProposalStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobGenie API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: Postgres when configured, otherwise process memory
    let store: Arc<dyn ProposalStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set; training data and history are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize LLM client
    let transport = ReqwestTransport::new(Duration::from_secs(config.llm_timeout_secs))?;
    let settings = DispatchSettings::from(&config);
    if settings.defaults.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; every request must carry its own provider key");
    }
    let llm = LlmClient::new(Arc::new(transport), settings);
    info!(
        "LLM client initialized (default provider: {}, temperature: {})",
        llm.default_provider(),
        config.llm_temperature
    );

    let state = AppState {
        store,
        llm,
        inflight: InFlightRegistry::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
