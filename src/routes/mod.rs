use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::AppResult,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::catalog::{load_snapshot, CatalogSnapshot, CatalogStore},
};

pub mod catalog;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, config: Config) -> Self {
        Self { catalog, config }
    }

    /// Takes a fresh snapshot of the catalog for one request
    pub async fn snapshot(&self) -> AppResult<CatalogSnapshot> {
        load_snapshot(self.catalog.as_ref(), self.config.attribute_policy).await
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .route("/catalog/statistics", get(catalog::statistics))
        .route("/mood-tags", get(catalog::mood_tags))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
