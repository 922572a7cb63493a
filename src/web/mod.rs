// Web server: Axum-based upload form for comparing two documents.
//
// GET / serves the form, POST /compare accepts the two uploads and renders
// the result page. The embedding model and the page templates are loaded
// once before the server starts and shared read-only by every request.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use handlebars::Handlebars;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::similarity::TextEmbedder;

pub mod handlers;
pub mod uploads;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub embedder: Arc<dyn TextEmbedder>,
    pub templates: Arc<Handlebars<'static>>,
}

impl AppState {
    /// Bundle the config and model with the compiled page templates.
    pub fn new(config: Config, embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            embedder,
            templates: Arc::new(handlers::templates()?),
        })
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    embedder: Arc<dyn TextEmbedder>,
    port: u16,
    bind: &str,
) -> Result<()> {
    std::fs::create_dir_all(&config.upload_dir)?;
    if config.keep_uploads {
        info!(
            "Uploaded files will be kept in {}",
            config.upload_dir.display()
        );
    }

    let state = AppState::new(config, embedder)?;

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("doccmp listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_mb.saturating_mul(1024 * 1024);

    Router::new()
        .route("/", get(handlers::index))
        .route("/compare", post(handlers::compare))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check. Always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Plain-text error response with the given status.
pub fn text_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message.into(),
    )
        .into_response()
}
