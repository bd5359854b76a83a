//! HTTP server: headline search API and archive browser.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/search?q=&limit=&page=` | Headline search (JSON) |
//! | `GET`  | `/archive/{name}?year=&month=&day=&articlePath=&full=&lang=` | Archive browser (HTML) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Search failures answer with the matching status and
//! `{ "error": "<message>" }`. Any method other than `GET` on
//! `/api/search` gets `405` with a plain-text body such as
//! `POST method not allowed.`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the static archive
//! pages can call the search API from another host.

use axum::{
    extract::{Path, RawQuery, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use news_archive_core::models::SearchResponse;
use news_archive_core::nav::NavigationTarget;
use news_archive_core::query::RawSearchParams;
use news_archive_core::store::HeadlineStore;

use crate::archives::ArchiveRegistry;
use crate::browse::{resolve_view, ErrorKind, Page};
use crate::config::Config;
use crate::render::{render_unknown_archive, render_view};
use crate::search::{execute_search, open_store, SearchError};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no headline database is configured or it cannot be opened.
    pub headlines: Option<Arc<dyn HeadlineStore>>,
    pub archives: Arc<ArchiveRegistry>,
}

impl AppState {
    pub fn new(headlines: Option<Arc<dyn HeadlineStore>>, archives: ArchiveRegistry) -> Self {
        Self {
            headlines,
            archives: Arc::new(archives),
        }
    }
}

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/search",
            // HEAD would otherwise be served by the GET handler.
            get(handle_search)
                .head(handle_method_not_allowed)
                .fallback(handle_method_not_allowed),
        )
        .route("/archive/{name}", get(handle_archive))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind`.
///
/// A missing or unreadable headline database does not stop the server: the
/// archive browser keeps working and searches answer with a configuration
/// error.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let headlines: Option<Arc<dyn HeadlineStore>> = match open_store(config).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "headline search disabled");
            None
        }
    };
    let state = AppState::new(headlines, ArchiveRegistry::from_config(config));
    run_server_with_state(&config.server.bind, state).await
}

/// Serve `state` on `bind_addr` until the process is terminated.
pub async fn run_server_with_state(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let archives = state.archives.names().join(", ");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    println!("News archive server listening on http://{}", bind_addr);
    tracing::info!(
        bind = bind_addr,
        search = state.headlines.is_some(),
        archives = %archives,
        "server started"
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/search ============

async fn handle_search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<SearchResponse>, SearchError> {
    let request = RawSearchParams::parse(query.as_deref().unwrap_or_default()).normalize();
    let response = execute_search(state.headlines.as_deref(), &request).await?;
    Ok(Json(response))
}

async fn handle_method_not_allowed(method: Method) -> (StatusCode, String) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        format!("{} method not allowed.", method),
    )
}

// ============ GET /archive/{name} ============

async fn handle_archive(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Html<String>) {
    let Some(archive) = state.archives.get(&name) else {
        return (
            StatusCode::NOT_FOUND,
            Html(render_unknown_archive(&name).into_string()),
        );
    };

    let target = NavigationTarget::parse(query.as_deref().unwrap_or_default());
    let view = resolve_view(&archive, &target).await;
    let status = match &view.page {
        Page::Error { kind, .. } => match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Invalid => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::BAD_GATEWAY,
        },
        _ => StatusCode::OK,
    };

    (status, Html(render_view(&archive, &view).into_string()))
}
