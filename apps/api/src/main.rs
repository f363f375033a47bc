mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod scheduling;
mod scoring;
mod sessions;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::interview::speech::{HttpSttClient, HttpTtsClient};
use crate::llm_client::OpenRouterClient;
use crate::routes::build_router;
use crate::scheduling::mailer::SmtpMailer;
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

    info!("Starting SmartHire API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;

    // Collaborator clients: constructed once, shared for the process lifetime
    let llm = Arc::new(OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_base_url.clone(),
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let stt = Arc::new(HttpSttClient::new(config.stt_url.clone())?);
    let tts = Arc::new(HttpTtsClient::new(config.tts_url.clone())?);
    info!("Speech clients initialized");

    let mailer = Arc::new(SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        &config.sender_email,
        &config.sender_password,
    )?);
    info!("SMTP mailer initialized ({})", config.smtp_host);

    // Build app state
    let state = AppState {
        db: pool,
        llm,
        stt,
        tts,
        mailer,
        config: config.clone(),
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
