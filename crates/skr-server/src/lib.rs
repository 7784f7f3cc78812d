//! # skr-server
//!
//! HTTP surface of the skills registry:
//!
//! - `GET /api/skills`: the store's tags aggregated into skill records,
//!   recomputed on every request
//! - `GET /skills.json`: redirect to `/api/skills`
//! - `GET /health`, `GET /metrics`
//! - the embedded registry UI for everything else
//!
//! [`site::generate_site`] writes the same UI plus a `skills.json` snapshot to
//! a directory for static hosting.

pub mod metrics;
pub mod site;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
};
use rust_embed::RustEmbed;
use serde::Serialize;
use skr_store::{ArtifactStore, TagAggregator};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Registry UI assets embedded at compile time from the workspace `web/` directory.
#[derive(RustEmbed)]
#[folder = "../../web/"]
pub struct WebAssets;

/// HTTP server options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub listen: String,
    /// Serve the embedded UI.
    pub web_ui: bool,
    /// Enable permissive CORS.
    pub cors: bool,
    /// Upper bound on resolving and fetching a single tag.
    pub fetch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".into(),
            web_ui: true,
            cors: false,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Shared server state.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn ArtifactStore>,
    pub metrics: metrics::Metrics,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Build the Axum router.
pub fn build_router(config: ServerConfig, store: Arc<dyn ArtifactStore>) -> Router {
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        metrics: metrics::Metrics::new(),
    });

    let mut router = Router::new()
        .route("/api/skills", get(skills_handler))
        .route("/skills.json", get(skills_json_redirect))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    if config.web_ui {
        router = router.fallback(embedded_file_handler);
    }

    let mut router = router.with_state(state).layer(TraceLayer::new_for_http());

    if config.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Aggregate the store on every request. A failed listing is a 500; tags
/// that fail individually are left out of the response.
async fn skills_handler(State(state): State<Arc<AppState>>) -> Response {
    state.metrics.inc_http_requests();
    state.metrics.inc_catalog_builds();

    let catalog = match TagAggregator::new(state.store.as_ref())
        .with_timeout(state.config.fetch_timeout)
        .collect()
        .await
    {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, "failed to list skills");
            state.metrics.inc_http_errors();
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list skills: {e}"),
            )
                .into_response();
        }
    };
    state.metrics.add_skipped_tags(catalog.skipped.len() as u64);

    match serde_json::to_vec(&catalog.skills) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to encode skills");
            state.metrics.inc_http_errors();
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode skills").into_response()
        }
    }
}

async fn skills_json_redirect(State(state): State<Arc<AppState>>) -> Redirect {
    state.metrics.inc_http_requests();
    Redirect::temporary("/api/skills")
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    state.metrics.inc_http_requests();
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Prometheus-compatible metrics endpoint.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics.render_prometheus(),
    )
}

/// Serve a file from the embedded [`WebAssets`], `index.html` for `/`.
async fn embedded_file_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match WebAssets::get(path) {
        Some(content) => {
            let mime = content.metadata.mimetype().to_string();
            ([(header::CONTENT_TYPE, mime)], content.data.into_owned()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Bind and serve until the process is stopped.
pub async fn start_server(
    config: ServerConfig,
    store: Arc<dyn ArtifactStore>,
) -> skr_core::Result<()> {
    let listen = config.listen.clone();
    let router = build_router(config, store);

    info!(listen = %listen, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| server_err(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| server_err(format!("server error: {e}")))?;

    Ok(())
}

fn server_err(msg: String) -> skr_core::SkrError {
    skr_core::SkrError::Io(std::io::Error::other(msg))
}
