mod answers;
mod config;
mod errors;
mod routes;
mod segmenter;
mod state;
mod technical_tests;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::technical_tests::repository::InMemoryTestRepository;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so the log filter can use RUST_LOG from .env
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

    info!("Starting Clipers API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Document limit {} bytes, test time limit {}s",
        config.max_document_bytes, config.test_time_limit_secs
    );

    let state = AppState {
        config: config.clone(),
        tests: Arc::new(InMemoryTestRepository::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the Clipers web frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
