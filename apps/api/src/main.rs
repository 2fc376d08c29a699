mod config;
mod errors;
mod ingest;
mod lesson;
mod llm_client;
mod routes;
mod settings;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::lesson::service::GenerationSlot;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::settings::ModelStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing GEMINI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lesson Plan API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client
    let client = GeminiClient::new(
        config.gemini_api_key.clone(),
        &config.gemini_api_url,
        config.generation_timeout_secs,
    )?;
    info!(
        "Gemini client initialized (timeout: {}s)",
        config.generation_timeout_secs
    );

    // Restore the persisted model selection
    let models = ModelStore::load(config.model_store_path.clone()).await;
    info!("Active model: {}", models.current().await);

    let state = AppState {
        generator: Arc::new(client),
        models,
        slot: GenerationSlot::default(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
