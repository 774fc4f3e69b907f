mod advisor;
mod config;
mod cv;
mod db;
mod delegates;
mod errors;
mod extract;
mod jobs;
mod livekit;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::advisor::prompts::ADVISOR_SYSTEM_PROMPT;
use crate::advisor::runtime::ToolCallingAgent;
use crate::advisor::service::AdvisorService;
use crate::advisor::tools::ToolSet;
use crate::config::Config;
use crate::cv::retrieval::CvReviewTool;
use crate::cv::store::QdrantCvStore;
use crate::db::create_pool;
use crate::delegates::DelegateClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    // Job listings (read-only SQLite pool)
    let jobs_db = create_pool(&config.jobs_database_url).await?;

    // Vector CV store
    let cv_store = QdrantCvStore::new(
        &config.qdrant_endpoint,
        config.qdrant_api_key.clone(),
        config.cv_collection.clone(),
    )
    .context("Failed to build Qdrant client")?;
    cv_store
        .ensure_session_index()
        .await
        .context("Failed to ensure session index on CV collection")?;

    // Advisor agent
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let runtime = ToolCallingAgent::new(llm, ADVISOR_SYSTEM_PROMPT);
    let tools = ToolSet::new(vec![Arc::new(CvReviewTool::new(Arc::new(cv_store)))]);
    let advisor = Arc::new(AdvisorService::new(Arc::new(runtime), tools));

    // Delegate agents
    let delegates = DelegateClient::new(
        config.document_agent_url.clone(),
        config.search_agent_url.clone(),
    )?;
    if config.document_agent_url.is_none() || config.search_agent_url.is_none() {
        info!("Delegate agent URLs partially unset; those endpoints will answer 501");
    }

    // Build app state
    let state = AppState {
        jobs_db: jobs_db.clone(),
        advisor,
        delegates,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the UI host once it is deployed behind a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped; closing job database pool");
    jobs_db.close().await;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
