use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod store;
mod web;

use crate::config::Config;
use crate::store::{FileStore, ItemStore};

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_server=debug".parse().unwrap()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let state = AppState {
        store: Arc::new(FileStore::new(config.data_path.clone())),
    };

    let web_app = web::router(config.public_dir.clone());
    let api_app = build_api_router(state);

    let web_addr = format!("{}:{}", config.host, config.web_port);
    let api_addr = format!("{}:{}", config.host, config.api_port);

    let web_listener = TcpListener::bind(&web_addr)
        .await
        .with_context(|| format!("failed to bind web listener on {web_addr}"))?;
    let api_listener = TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {api_addr}"))?;

    info!("Web server running on http://{}", web_addr);
    info!("API server running on http://{}", api_addr);
    info!(
        data_path = %config.data_path.display(),
        public_dir = %config.public_dir.display(),
        "Serving"
    );

    // Two independent listeners, one process.
    tokio::try_join!(
        axum::serve(web_listener, web_app).into_future(),
        axum::serve(api_listener, api_app).into_future(),
    )?;

    Ok(())
}

fn build_api_router(state: AppState) -> Router {
    Router::new()
        // ── Items CRUD ──────────────────────────────────────────────────────
        .route(
            "/api/items",
            get(handlers::items::list_items)
                .post(handlers::items::create_item)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/items/:id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item)
                .fallback(handlers::method_not_allowed),
        )
        // ── Everything else ─────────────────────────────────────────────────
        .fallback(handlers::route_not_found)
        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
