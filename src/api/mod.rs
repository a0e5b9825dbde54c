//! Read-only JSON query service over the stored graph
//!
//! Serves the persisted shows, writers, links and overlap report as JSON
//! for downstream visualizations. Strictly read-only and independent of
//! the crawl; it can run while the database is being expanded, subject to
//! SQLite's usual reader semantics.

use crate::config::ApiConfig;
use crate::storage::{SqliteStore, Store, StorageError};
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<SqliteStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // The browser clients are static pages served from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/shows", get(get_shows))
        .route("/api/writers", get(get_writers))
        .route("/api/links", get(get_links))
        .route("/api/overlaps", get(get_overlaps))
        .route("/api/all", get(get_all))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Serves the API until the process is stopped
pub async fn serve(store: SqliteStore, config: &ApiConfig) -> crate::Result<()> {
    let app = build_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Storage failures surface as a JSON 500
struct ApiError(StorageError);

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("API storage error: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.0.to_string()})),
        )
            .into_response()
    }
}

async fn get_shows(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.store.all_shows()?).into_response())
}

async fn get_writers(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.store.all_writers()?).into_response())
}

async fn get_links(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.store.all_links()?).into_response())
}

async fn get_overlaps(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.store.overlap_report()?).into_response())
}

async fn get_all(State(state): State<AppState>) -> Result<Response, ApiError> {
    let payload = json!({
        "shows": state.store.all_shows()?,
        "writers": state.store.all_writers()?,
        "links": state.store.all_links()?,
        "overlaps": state.store.overlap_report()?,
    });
    Ok(Json(payload).into_response())
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
}
