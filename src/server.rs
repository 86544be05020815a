//! Catalog preview server.
//!
//! Serves the persisted catalog, its sitemap and the search filter over
//! HTTP so the site (or a developer) can exercise them without a static
//! build. The catalog is loaded once at startup and shared read-only.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version and paper count) |
//! | `GET`  | `/papers.json` | The full catalog |
//! | `GET`  | `/papers/{id}` | First record with this id |
//! | `GET`  | `/search?q=` | Search filter results |
//! | `GET`  | `/stats` | Catalog summary |
//! | `GET`  | `/sitemap.xml` | Sitemap (`application/xml`, cached 1 hour) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "no paper with id g6-x" } }
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::catalog::read_catalog;
use crate::config::Config;
use crate::models::Record;
use crate::search::{search_catalog, SearchResponse};
use crate::sitemap::{self, render_sitemap};
use crate::stats::{summarize, CatalogSummary};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    records: Arc<Vec<Record>>,
    base_url: Arc<str>,
}

/// Build the router over an in-memory catalog.
pub fn router(records: Vec<Record>, base_url: &str) -> Router {
    let state = AppState {
        records: Arc::new(records),
        base_url: Arc::from(base_url),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/papers.json", get(handle_papers))
        .route("/papers/{id}", get(handle_paper))
        .route("/search", get(handle_search))
        .route("/stats", get(handle_stats))
        .route("/sitemap.xml", get(handle_sitemap))
        .layer(cors)
        .with_state(state)
}

/// Load the catalog and serve it on `[server].bind` until terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let records = read_catalog(&config.catalog.output)?;
    let count = records.len();
    let app = router(records, &config.site.base_url);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, papers = count, "catalog server listening");
    println!("Catalog server listening on http://{}", config.server.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ Handlers ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    papers: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        papers: state.records.len(),
    })
}

async fn handle_papers(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.records.as_ref().clone())
}

/// Ids are not guaranteed unique; the first (newest) record wins.
async fn handle_paper(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, AppError> {
    state
        .records
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("no paper with id {}", id)))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<serde_json::Value> {
    let outcome = search_catalog(&state.records, &params.q);
    let response = SearchResponse::new(&params.q, outcome);
    Json(serde_json::to_value(&response).unwrap_or_default())
}

async fn handle_stats(State(state): State<AppState>) -> Json<CatalogSummary> {
    Json(summarize(&state.records, Utc::now()))
}

async fn handle_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let xml = render_sitemap(&state.records, &state.base_url, Utc::now());
    (
        [
            (header::CONTENT_TYPE, sitemap::CONTENT_TYPE),
            (header::CACHE_CONTROL, sitemap::CACHE_CONTROL),
        ],
        xml,
    )
}
