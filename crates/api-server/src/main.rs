//! API Server for the todo functions
//!
//! Serves the reorder and account endpoints over HTTP, backed by Appwrite
//! (or an in-memory backend for local runs).

mod config;
mod routes;
mod state;

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::FunctionConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=debug,todo_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FunctionConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        "Using {} backend, order offset {}",
        config.backend.name(),
        config.reorder.offset
    );

    let app_state = AppState::from_config(&config)
        .await
        .context("Failed to initialize application state")?;

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::reorder::router())
        .merge(routes::account::router())
        .with_state(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("REST API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
