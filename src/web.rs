//! Static file serving for the public directory (the web listener).

use std::path::PathBuf;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::fs;
use tower_http::trace::TraceLayer;
use tracing::debug;

const NOT_FOUND_PAGE: &str = "<h1>404 - Page Not Found</h1>";

pub fn router(public_dir: PathBuf) -> Router {
    Router::new()
        .fallback(serve_public)
        .layer(TraceLayer::new_for_http())
        .with_state(public_dir)
}

/// Resolve the request path against the public directory (`/` maps to
/// `index.html`), read the file, and respond with its contents, or the fixed
/// 404 page. Everything is served as HTML; the client path is joined as sent,
/// with no traversal guard.
async fn serve_public(State(public_dir): State<PathBuf>, uri: Uri) -> Response {
    let path = uri.path();
    let relative = if path == "/" {
        "index.html"
    } else {
        path.trim_start_matches('/')
    };

    match fs::read(public_dir.join(relative)).await {
        Ok(contents) => (StatusCode::OK, Html(contents)).into_response(),
        Err(err) => {
            debug!(path, %err, "static file miss");
            (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
        }
    }
}
